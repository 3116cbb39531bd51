//! File-backed gateway over a local settings store.
//!
//! Layout:
//! - `<store>/config.json`: global defaults
//! - `<store>/GamesConfig/<entity>.json`: per-game overrides
//! - `<store>/library.json`: entity id -> `{ title, runner, canRunOffline }`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::clipboard::ClipboardTarget;
use super::{EntityInfo, SettingsGateway};
use crate::config::paths::{library_path, settings_path_for_entity};
use crate::settings::ConfigurationPayload;
use crate::types::{EntityId, Runner};

/// One installed or owned game as recorded in `library.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub title: String,
    #[serde(default)]
    pub runner: Runner,
    #[serde(default = "default_can_run_offline")]
    pub can_run_offline: bool,
}

fn default_can_run_offline() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct LocalGateway {
    store_dir: PathBuf,
    clipboard: ClipboardTarget,
}

impl LocalGateway {
    pub fn new(store_dir: PathBuf) -> Self {
        Self {
            store_dir,
            clipboard: ClipboardTarget::default(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: ClipboardTarget) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Path of the record holding `entity`'s settings.
    pub fn config_path(&self, entity: &EntityId) -> anyhow::Result<PathBuf> {
        validate_entity_id(entity)?;
        Ok(settings_path_for_entity(&self.store_dir, entity))
    }

    pub fn load_library(&self) -> anyhow::Result<HashMap<String, LibraryEntry>> {
        let path = library_path(&self.store_dir);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read library file: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse library file: {}", path.display()))
    }

    pub fn save_library(&self, library: &HashMap<String, LibraryEntry>) -> anyhow::Result<()> {
        let path = library_path(&self.store_dir);
        let value = serde_json::to_value(library).context("Failed to serialize library")?;
        match value {
            Value::Object(map) => write_json_map(&path, &map),
            _ => anyhow::bail!("Library did not serialize to a JSON object"),
        }
    }
}

impl SettingsGateway for LocalGateway {
    async fn request_settings(&self, entity: &EntityId) -> anyhow::Result<Map<String, Value>> {
        let path = self.config_path(entity)?;
        tracing::debug!(entity = %entity, path = %path.display(), "reading settings record");
        load_json_map(&path)
    }

    async fn request_entity_info(
        &self,
        entity: &EntityId,
        runner: Runner,
    ) -> anyhow::Result<EntityInfo> {
        validate_entity_id(entity)?;
        let library = self.load_library()?;
        let entry = library
            .get(entity.as_str())
            .ok_or_else(|| anyhow::anyhow!("Game not found in library: {}", entity))?;
        if entry.runner != runner {
            tracing::warn!(
                entity = %entity,
                requested = runner.as_str(),
                recorded = entry.runner.as_str(),
                "runner mismatch for library entry"
            );
        }
        Ok(EntityInfo {
            title: entry.title.clone(),
            can_run_offline: entry.can_run_offline,
        })
    }

    fn write_configuration(
        &self,
        entity: &EntityId,
        payload: &ConfigurationPayload,
    ) -> anyhow::Result<()> {
        let path = self.config_path(entity)?;
        let mut stored = load_json_map(&path)?;
        let payload = payload
            .to_map()
            .context("Failed to serialize settings payload")?;
        for (key, value) in payload {
            stored.insert(key, value);
        }
        write_json_map(&path, &stored)?;
        tracing::debug!(entity = %entity, path = %path.display(), "settings written");
        Ok(())
    }

    fn reveal_config_file(&self, entity: &EntityId) -> anyhow::Result<()> {
        let path = self.config_path(entity)?;
        let folder = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Config file has no parent: {}", path.display()))?;
        if !folder.exists() {
            anyhow::bail!("Config folder does not exist yet: {}", folder.display());
        }
        open::that(folder)
            .with_context(|| format!("Failed to open file manager at {}", folder.display()))
    }

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()> {
        self.clipboard.copy(text)
    }
}

fn validate_entity_id(entity: &EntityId) -> anyhow::Result<()> {
    let id = entity.as_str();
    if id.is_empty() {
        anyhow::bail!("Entity id cannot be empty");
    }
    if id.contains(['/', '\\']) || id == "." || id == ".." {
        anyhow::bail!("Invalid entity id: {}", id);
    }
    Ok(())
}

fn load_json_map(path: &Path) -> anyhow::Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let value: Value =
        serde_json::from_slice(&bytes).with_context(|| "Failed to parse JSON config")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Expected JSON object at root: {}", path.display()),
    }
}

fn write_json_map(path: &Path, map: &Map<String, Value>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(map).context("Failed to serialize JSON config")?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_cannot_escape_the_store() {
        assert!(validate_entity_id(&EntityId::new("../etc")).is_err());
        assert!(validate_entity_id(&EntityId::new("")).is_err());
        assert!(validate_entity_id(&EntityId::new("..")).is_err());
        assert!(validate_entity_id(&EntityId::new("Fortnite")).is_ok());
    }

    #[test]
    fn missing_record_loads_empty() {
        let map = load_json_map(Path::new("/nonexistent/hearth/config.json")).unwrap();
        assert!(map.is_empty());
    }
}
