//! Store path resolution helpers.

use std::path::{Path, PathBuf};

use crate::types::EntityId;

pub const LAUNCHER_CONFIG_FILE: &str = "hearth.toml";
pub const GLOBAL_SETTINGS_FILE: &str = "config.json";
pub const GAME_SETTINGS_DIR: &str = "GamesConfig";
pub const LIBRARY_FILE: &str = "library.json";

pub fn launcher_config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LAUNCHER_CONFIG_FILE)
}

pub fn default_store_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("store")
}

/// Record holding the settings of `entity`; `default` maps to the global file.
pub fn settings_path_for_entity(store_dir: &Path, entity: &EntityId) -> PathBuf {
    if entity.is_default() {
        store_dir.join(GLOBAL_SETTINGS_FILE)
    } else {
        store_dir
            .join(GAME_SETTINGS_DIR)
            .join(format!("{}.json", entity.as_str()))
    }
}

pub fn library_path(store_dir: &Path) -> PathBuf {
    store_dir.join(LIBRARY_FILE)
}
