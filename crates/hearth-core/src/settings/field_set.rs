//! The full field set held by a settings buffer.
//!
//! Stored records are read leniently: a field that is missing, `null` or of
//! the wrong type takes its documented default, and unknown keys are ignored. Older records that
//! predate a field therefore load without error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{FieldName, FieldValue};
use super::wine::WineInstallation;
use crate::context::Environment;
use crate::error::{Result, SettingsError};

pub const DEFAULT_MAX_SHARPNESS: i64 = 2;
pub const DEFAULT_MAX_WORKERS: i64 = 0;
pub const DEFAULT_MAX_RECENT_GAMES: i64 = 5;
pub const DEFAULT_CROSSOVER_BOTTLE: &str = "Heroic";

pub const MAX_RECENT_GAMES_RANGE: std::ops::RangeInclusive<i64> = 1..=30;
pub const SHARPNESS_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSet {
    // Global only
    pub add_desktop_shortcuts: bool,
    pub add_start_menu_shortcuts: bool,
    pub alt_gogdl_bin: String,
    pub alt_legendary_bin: String,
    pub custom_wine_paths: Vec<String>,
    pub dark_tray_icon: bool,
    pub default_install_path: String,
    pub default_wine_prefix: String,
    pub disable_controller: bool,
    #[serde(rename = "discordRPC")]
    pub discord_rpc: bool,
    pub egs_linked_path: String,
    pub exit_to_tray: bool,
    pub max_recent_games: i64,
    /// 0 means "auto".
    pub max_workers: i64,
    pub minimize_on_launch: bool,
    pub show_unreal_market: bool,
    pub start_in_tray: bool,

    // Override only
    pub auto_sync_saves: bool,
    pub launcher_args: String,
    pub max_sharpness: i64,
    pub offline_mode: bool,
    pub saves_path: String,
    pub target_exe: String,
    pub use_steam_runtime: bool,

    // Both scopes
    pub audio_fix: bool,
    pub auto_install_dxvk: bool,
    pub auto_install_vkd3d: bool,
    pub enable_esync: bool,
    #[serde(rename = "enableFSR")]
    pub enable_fsr: bool,
    pub enable_fsync: bool,
    pub enable_resizable_bar: bool,
    pub nvidia_prime: bool,
    pub other_options: String,
    pub show_fps: bool,
    pub show_mangohud: bool,
    pub use_game_mode: bool,
    pub wine_crossover_bottle: String,
    pub wine_prefix: String,
    pub wine_version: WineInstallation,
}

/// An advisory problem with a field value. Values are still persisted as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: FieldName,
    pub message: String,
}

impl FieldSet {
    /// Documented defaults, with the Wine prefix placed under the user's home.
    pub fn defaults(env: &Environment) -> Self {
        Self {
            add_desktop_shortcuts: false,
            add_start_menu_shortcuts: false,
            alt_gogdl_bin: String::new(),
            alt_legendary_bin: String::new(),
            custom_wine_paths: Vec::new(),
            dark_tray_icon: false,
            default_install_path: String::new(),
            default_wine_prefix: String::new(),
            disable_controller: false,
            discord_rpc: false,
            egs_linked_path: String::new(),
            exit_to_tray: false,
            max_recent_games: DEFAULT_MAX_RECENT_GAMES,
            max_workers: DEFAULT_MAX_WORKERS,
            minimize_on_launch: false,
            show_unreal_market: false,
            start_in_tray: false,
            auto_sync_saves: false,
            launcher_args: String::new(),
            max_sharpness: DEFAULT_MAX_SHARPNESS,
            offline_mode: false,
            saves_path: String::new(),
            target_exe: String::new(),
            use_steam_runtime: false,
            audio_fix: false,
            auto_install_dxvk: false,
            auto_install_vkd3d: false,
            enable_esync: false,
            enable_fsr: false,
            enable_fsync: false,
            enable_resizable_bar: false,
            nvidia_prime: false,
            other_options: String::new(),
            show_fps: false,
            show_mangohud: false,
            use_game_mode: false,
            wine_crossover_bottle: DEFAULT_CROSSOVER_BOTTLE.to_string(),
            wine_prefix: env.default_wine_prefix(),
            wine_version: WineInstallation::default(),
        }
    }

    /// Populate a field set from a stored record, defaulting what it lacks.
    pub fn from_response(response: &Map<String, Value>, env: &Environment) -> Result<Self> {
        let mut merged = match serde_json::to_value(Self::defaults(env)) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(SettingsError::Malformed("defaults are not an object".into())),
            Err(e) => return Err(SettingsError::Malformed(e.to_string())),
        };

        for (key, value) in response {
            if value.is_null() {
                continue;
            }
            match FieldName::try_from(key.as_str()) {
                Ok(field) if field.is_derived() => {
                    tracing::trace!(key = %key, "ignoring derived key in response");
                }
                Ok(field) if !field.kind().accepts(value) => {
                    tracing::warn!(
                        field = %field,
                        expected = %field.kind(),
                        "stored value has the wrong type, using the default"
                    );
                }
                Ok(_) => {
                    merged.insert(key.clone(), value.clone());
                }
                Err(_) => tracing::trace!(key = %key, "ignoring non-settings key in response"),
            }
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| SettingsError::Malformed(e.to_string()))
    }

    /// Current value of a persisted field; `None` for derived fields.
    pub fn get(&self, field: FieldName) -> Option<FieldValue> {
        use FieldName as F;
        use FieldValue::{Bool, Integer, List, Text, Wine};

        let value = match field {
            F::AddDesktopShortcuts => Bool(self.add_desktop_shortcuts),
            F::AddStartMenuShortcuts => Bool(self.add_start_menu_shortcuts),
            F::AltGogdlBin => Text(self.alt_gogdl_bin.clone()),
            F::AltLegendaryBin => Text(self.alt_legendary_bin.clone()),
            F::CustomWinePaths => List(self.custom_wine_paths.clone()),
            F::DarkTrayIcon => Bool(self.dark_tray_icon),
            F::DefaultInstallPath => Text(self.default_install_path.clone()),
            F::DefaultWinePrefix => Text(self.default_wine_prefix.clone()),
            F::DisableController => Bool(self.disable_controller),
            F::DiscordRpc => Bool(self.discord_rpc),
            F::EgsLinkedPath => Text(self.egs_linked_path.clone()),
            F::ExitToTray => Bool(self.exit_to_tray),
            F::MaxRecentGames => Integer(self.max_recent_games),
            F::MaxWorkers => Integer(self.max_workers),
            F::MinimizeOnLaunch => Bool(self.minimize_on_launch),
            F::ShowUnrealMarket => Bool(self.show_unreal_market),
            F::StartInTray => Bool(self.start_in_tray),
            F::AutoSyncSaves => Bool(self.auto_sync_saves),
            F::LauncherArgs => Text(self.launcher_args.clone()),
            F::MaxSharpness => Integer(self.max_sharpness),
            F::OfflineMode => Bool(self.offline_mode),
            F::SavesPath => Text(self.saves_path.clone()),
            F::TargetExe => Text(self.target_exe.clone()),
            F::UseSteamRuntime => Bool(self.use_steam_runtime),
            F::AudioFix => Bool(self.audio_fix),
            F::AutoInstallDxvk => Bool(self.auto_install_dxvk),
            F::AutoInstallVkd3d => Bool(self.auto_install_vkd3d),
            F::EnableEsync => Bool(self.enable_esync),
            F::EnableFsr => Bool(self.enable_fsr),
            F::EnableFsync => Bool(self.enable_fsync),
            F::EnableResizableBar => Bool(self.enable_resizable_bar),
            F::NvidiaPrime => Bool(self.nvidia_prime),
            F::OtherOptions => Text(self.other_options.clone()),
            F::ShowFps => Bool(self.show_fps),
            F::ShowMangohud => Bool(self.show_mangohud),
            F::UseGameMode => Bool(self.use_game_mode),
            F::WineCrossoverBottle => Text(self.wine_crossover_bottle.clone()),
            F::WinePrefix => Text(self.wine_prefix.clone()),
            F::WineVersion => Wine(self.wine_version.clone()),
            F::CanRunOffline | F::IsLinuxNative | F::IsMacNative => return None,
        };
        Some(value)
    }

    /// Overwrite one field. Only the value kind is checked.
    ///
    /// Returns whether the stored value changed.
    pub fn set(&mut self, field: FieldName, value: FieldValue) -> Result<bool> {
        if field.is_derived() {
            return Err(SettingsError::ReadOnlyField(field));
        }
        if value.kind() != field.kind() {
            return Err(SettingsError::TypeMismatch {
                field,
                expected: field.kind(),
            });
        }

        let changed = match (self.slot(field), value) {
            (Some(Slot::Bool(slot)), FieldValue::Bool(value)) => replace(slot, value),
            (Some(Slot::Text(slot)), FieldValue::Text(value)) => replace(slot, value),
            (Some(Slot::Integer(slot)), FieldValue::Integer(value)) => replace(slot, value),
            (Some(Slot::List(slot)), FieldValue::List(value)) => replace(slot, value),
            (Some(Slot::Wine(slot)), FieldValue::Wine(value)) => replace(slot, value),
            _ => {
                return Err(SettingsError::TypeMismatch {
                    field,
                    expected: field.kind(),
                });
            }
        };
        Ok(changed)
    }

    fn slot(&mut self, field: FieldName) -> Option<Slot<'_>> {
        use FieldName as F;

        let slot = match field {
            F::AddDesktopShortcuts => Slot::Bool(&mut self.add_desktop_shortcuts),
            F::AddStartMenuShortcuts => Slot::Bool(&mut self.add_start_menu_shortcuts),
            F::AltGogdlBin => Slot::Text(&mut self.alt_gogdl_bin),
            F::AltLegendaryBin => Slot::Text(&mut self.alt_legendary_bin),
            F::CustomWinePaths => Slot::List(&mut self.custom_wine_paths),
            F::DarkTrayIcon => Slot::Bool(&mut self.dark_tray_icon),
            F::DefaultInstallPath => Slot::Text(&mut self.default_install_path),
            F::DefaultWinePrefix => Slot::Text(&mut self.default_wine_prefix),
            F::DisableController => Slot::Bool(&mut self.disable_controller),
            F::DiscordRpc => Slot::Bool(&mut self.discord_rpc),
            F::EgsLinkedPath => Slot::Text(&mut self.egs_linked_path),
            F::ExitToTray => Slot::Bool(&mut self.exit_to_tray),
            F::MaxRecentGames => Slot::Integer(&mut self.max_recent_games),
            F::MaxWorkers => Slot::Integer(&mut self.max_workers),
            F::MinimizeOnLaunch => Slot::Bool(&mut self.minimize_on_launch),
            F::ShowUnrealMarket => Slot::Bool(&mut self.show_unreal_market),
            F::StartInTray => Slot::Bool(&mut self.start_in_tray),
            F::AutoSyncSaves => Slot::Bool(&mut self.auto_sync_saves),
            F::LauncherArgs => Slot::Text(&mut self.launcher_args),
            F::MaxSharpness => Slot::Integer(&mut self.max_sharpness),
            F::OfflineMode => Slot::Bool(&mut self.offline_mode),
            F::SavesPath => Slot::Text(&mut self.saves_path),
            F::TargetExe => Slot::Text(&mut self.target_exe),
            F::UseSteamRuntime => Slot::Bool(&mut self.use_steam_runtime),
            F::AudioFix => Slot::Bool(&mut self.audio_fix),
            F::AutoInstallDxvk => Slot::Bool(&mut self.auto_install_dxvk),
            F::AutoInstallVkd3d => Slot::Bool(&mut self.auto_install_vkd3d),
            F::EnableEsync => Slot::Bool(&mut self.enable_esync),
            F::EnableFsr => Slot::Bool(&mut self.enable_fsr),
            F::EnableFsync => Slot::Bool(&mut self.enable_fsync),
            F::EnableResizableBar => Slot::Bool(&mut self.enable_resizable_bar),
            F::NvidiaPrime => Slot::Bool(&mut self.nvidia_prime),
            F::OtherOptions => Slot::Text(&mut self.other_options),
            F::ShowFps => Slot::Bool(&mut self.show_fps),
            F::ShowMangohud => Slot::Bool(&mut self.show_mangohud),
            F::UseGameMode => Slot::Bool(&mut self.use_game_mode),
            F::WineCrossoverBottle => Slot::Text(&mut self.wine_crossover_bottle),
            F::WinePrefix => Slot::Text(&mut self.wine_prefix),
            F::WineVersion => Slot::Wine(&mut self.wine_version),
            F::CanRunOffline | F::IsLinuxNative | F::IsMacNative => return None,
        };
        Some(slot)
    }

    /// Out-of-range or suspicious values, for display and logging.
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if self.max_workers < 0 {
            issues.push(FieldIssue {
                field: FieldName::MaxWorkers,
                message: format!("{} is negative; 0 means auto", self.max_workers),
            });
        }
        if !MAX_RECENT_GAMES_RANGE.contains(&self.max_recent_games) {
            issues.push(FieldIssue {
                field: FieldName::MaxRecentGames,
                message: format!(
                    "{} is outside {}..={}",
                    self.max_recent_games,
                    MAX_RECENT_GAMES_RANGE.start(),
                    MAX_RECENT_GAMES_RANGE.end()
                ),
            });
        }
        if !SHARPNESS_RANGE.contains(&self.max_sharpness) {
            issues.push(FieldIssue {
                field: FieldName::MaxSharpness,
                message: format!(
                    "{} is outside {}..={}",
                    self.max_sharpness,
                    SHARPNESS_RANGE.start(),
                    SHARPNESS_RANGE.end()
                ),
            });
        }

        for field in [
            FieldName::DefaultInstallPath,
            FieldName::DefaultWinePrefix,
            FieldName::WinePrefix,
            FieldName::SavesPath,
            FieldName::AltLegendaryBin,
            FieldName::AltGogdlBin,
        ] {
            if let Some(FieldValue::Text(path)) = self.get(field)
                && !path.is_empty()
                && !Path::new(&path).is_absolute()
            {
                issues.push(FieldIssue {
                    field,
                    message: format!("'{path}' is not an absolute path"),
                });
            }
        }

        for path in &self.custom_wine_paths {
            if !Path::new(path).is_absolute() {
                issues.push(FieldIssue {
                    field: FieldName::CustomWinePaths,
                    message: format!("'{path}' is not an absolute path"),
                });
            }
        }

        issues
    }
}

enum Slot<'a> {
    Bool(&'a mut bool),
    Text(&'a mut String),
    Integer(&'a mut i64),
    List(&'a mut Vec<String>),
    Wine(&'a mut WineInstallation),
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
