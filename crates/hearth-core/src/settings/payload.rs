//! Scope-filtered payloads sent to the persistence gateway.
//!
//! `ConfigurationPayload::derive` is the only way to build a payload, so a
//! field can never end up in the wrong scope's record.

use serde::Serialize;
use serde_json::{Map, Value};

use super::field_set::FieldSet;
use super::fields::{FieldName, FieldValue, Membership};
use super::wine::WineInstallation;
use crate::types::{ConfigScope, EntityId};

/// Fields persisted for the process-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    alt_legendary_bin: String,
    alt_gogdl_bin: String,
    add_desktop_shortcuts: bool,
    add_start_menu_shortcuts: bool,
    audio_fix: bool,
    auto_install_dxvk: bool,
    auto_install_vkd3d: bool,
    custom_wine_paths: Vec<String>,
    dark_tray_icon: bool,
    default_install_path: String,
    default_wine_prefix: String,
    disable_controller: bool,
    #[serde(rename = "discordRPC")]
    discord_rpc: bool,
    egs_linked_path: String,
    enable_esync: bool,
    enable_fsync: bool,
    exit_to_tray: bool,
    max_recent_games: i64,
    max_workers: i64,
    minimize_on_launch: bool,
    nvidia_prime: bool,
    other_options: String,
    show_fps: bool,
    show_mangohud: bool,
    show_unreal_market: bool,
    start_in_tray: bool,
    use_game_mode: bool,
    wine_crossover_bottle: String,
    wine_prefix: String,
    wine_version: WineInstallation,
    #[serde(rename = "enableFSR")]
    enable_fsr: bool,
    enable_resizable_bar: bool,
}

/// Fields persisted for one entity's overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    audio_fix: bool,
    auto_install_dxvk: bool,
    auto_install_vkd3d: bool,
    auto_sync_saves: bool,
    enable_esync: bool,
    #[serde(rename = "enableFSR")]
    enable_fsr: bool,
    enable_fsync: bool,
    max_sharpness: i64,
    enable_resizable_bar: bool,
    launcher_args: String,
    nvidia_prime: bool,
    offline_mode: bool,
    other_options: String,
    saves_path: String,
    show_fps: bool,
    show_mangohud: bool,
    target_exe: String,
    use_game_mode: bool,
    wine_crossover_bottle: String,
    wine_prefix: String,
    wine_version: WineInstallation,
    use_steam_runtime: bool,
}

impl GlobalSettings {
    fn from_fields(fields: &FieldSet) -> Self {
        Self {
            alt_legendary_bin: fields.alt_legendary_bin.clone(),
            alt_gogdl_bin: fields.alt_gogdl_bin.clone(),
            add_desktop_shortcuts: fields.add_desktop_shortcuts,
            add_start_menu_shortcuts: fields.add_start_menu_shortcuts,
            audio_fix: fields.audio_fix,
            auto_install_dxvk: fields.auto_install_dxvk,
            auto_install_vkd3d: fields.auto_install_vkd3d,
            custom_wine_paths: fields.custom_wine_paths.clone(),
            dark_tray_icon: fields.dark_tray_icon,
            default_install_path: fields.default_install_path.clone(),
            default_wine_prefix: fields.default_wine_prefix.clone(),
            disable_controller: fields.disable_controller,
            discord_rpc: fields.discord_rpc,
            egs_linked_path: fields.egs_linked_path.clone(),
            enable_esync: fields.enable_esync,
            enable_fsync: fields.enable_fsync,
            exit_to_tray: fields.exit_to_tray,
            max_recent_games: fields.max_recent_games,
            max_workers: fields.max_workers,
            minimize_on_launch: fields.minimize_on_launch,
            nvidia_prime: fields.nvidia_prime,
            other_options: fields.other_options.clone(),
            show_fps: fields.show_fps,
            show_mangohud: fields.show_mangohud,
            show_unreal_market: fields.show_unreal_market,
            start_in_tray: fields.start_in_tray,
            use_game_mode: fields.use_game_mode,
            wine_crossover_bottle: fields.wine_crossover_bottle.clone(),
            wine_prefix: fields.wine_prefix.clone(),
            wine_version: fields.wine_version.clone(),
            enable_fsr: fields.enable_fsr,
            enable_resizable_bar: fields.enable_resizable_bar,
        }
    }
}

impl GameSettings {
    fn from_fields(fields: &FieldSet) -> Self {
        Self {
            audio_fix: fields.audio_fix,
            auto_install_dxvk: fields.auto_install_dxvk,
            auto_install_vkd3d: fields.auto_install_vkd3d,
            auto_sync_saves: fields.auto_sync_saves,
            enable_esync: fields.enable_esync,
            enable_fsr: fields.enable_fsr,
            enable_fsync: fields.enable_fsync,
            max_sharpness: fields.max_sharpness,
            enable_resizable_bar: fields.enable_resizable_bar,
            launcher_args: fields.launcher_args.clone(),
            nvidia_prime: fields.nvidia_prime,
            offline_mode: fields.offline_mode,
            other_options: fields.other_options.clone(),
            saves_path: fields.saves_path.clone(),
            show_fps: fields.show_fps,
            show_mangohud: fields.show_mangohud,
            target_exe: fields.target_exe.clone(),
            use_game_mode: fields.use_game_mode,
            wine_crossover_bottle: fields.wine_crossover_bottle.clone(),
            wine_prefix: fields.wine_prefix.clone(),
            wine_version: fields.wine_version.clone(),
            use_steam_runtime: fields.use_steam_runtime,
        }
    }
}

/// The scope-appropriate projection of a field set. Serializes as a flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigurationPayload {
    Default(GlobalSettings),
    Override(GameSettings),
}

impl ConfigurationPayload {
    /// Select exactly the fields `scope` persists.
    pub fn derive(scope: &ConfigScope, fields: &FieldSet) -> Self {
        match scope {
            ConfigScope::Default => {
                ConfigurationPayload::Default(GlobalSettings::from_fields(fields))
            }
            ConfigScope::Override(_) => {
                ConfigurationPayload::Override(GameSettings::from_fields(fields))
            }
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigurationPayload::Default(_))
    }

    /// Payload as a JSON object, keys in declaration order.
    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(serde::ser::Error::custom("payload is not a JSON object")),
        }
    }

    pub fn contains(&self, field: FieldName) -> bool {
        match field.membership() {
            Membership::Global => self.is_default(),
            Membership::Override => !self.is_default(),
            Membership::Both => true,
            Membership::Derived => false,
        }
    }

    /// Value carried for `field`, if the payload's scope persists it.
    pub fn get(&self, field: FieldName) -> Option<FieldValue> {
        let value = self.to_map().ok()?.remove(field.as_str())?;
        let parsed = match value {
            Value::Bool(flag) => FieldValue::Bool(flag),
            Value::String(text) => FieldValue::Text(text),
            Value::Number(number) => FieldValue::Integer(number.as_i64()?),
            Value::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            wine @ Value::Object(_) => FieldValue::Wine(serde_json::from_value(wine).ok()?),
            Value::Null => return None,
        };
        Some(parsed)
    }
}

/// What "copy settings" puts on the clipboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardSnapshot<'a> {
    pub entity_id: &'a EntityId,
    pub title: &'a str,
    #[serde(flatten)]
    pub payload: &'a ConfigurationPayload,
}

impl<'a> ClipboardSnapshot<'a> {
    pub fn new(entity_id: &'a EntityId, title: &'a str, payload: &'a ConfigurationPayload) -> Self {
        Self {
            entity_id,
            title,
            payload,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Environment;
    use crate::types::Platform;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn fields() -> FieldSet {
        FieldSet::defaults(&Environment::new(
            PathBuf::from("/home/player"),
            Platform::Linux,
        ))
    }

    fn keys(payload: &ConfigurationPayload) -> BTreeSet<String> {
        payload.to_map().unwrap().keys().cloned().collect()
    }

    fn expected_keys(scope: &ConfigScope) -> BTreeSet<String> {
        FieldName::for_scope(scope)
            .map(|field| field.as_str().to_string())
            .collect()
    }

    #[test]
    fn default_payload_matches_membership_table() {
        let payload = ConfigurationPayload::derive(&ConfigScope::Default, &fields());
        assert_eq!(keys(&payload), expected_keys(&ConfigScope::Default));
        assert!(!payload.to_map().unwrap().contains_key("savesPath"));
        assert!(!payload.to_map().unwrap().contains_key("autoSyncSaves"));
        assert!(!payload.to_map().unwrap().contains_key("targetExe"));
    }

    #[test]
    fn override_payload_matches_membership_table() {
        let scope = ConfigScope::Override(EntityId::new("mygame"));
        let payload = ConfigurationPayload::derive(&scope, &fields());
        assert_eq!(keys(&payload), expected_keys(&scope));
        assert!(!payload.to_map().unwrap().contains_key("maxWorkers"));
        assert!(!payload.to_map().unwrap().contains_key("addDesktopShortcuts"));
    }

    #[test]
    fn to_map_keeps_declaration_order() {
        let payload = ConfigurationPayload::derive(&ConfigScope::Default, &fields());
        let map = payload.to_map().unwrap();
        let first: Vec<&str> = map.keys().take(3).map(String::as_str).collect();
        assert_eq!(first, ["altLegendaryBin", "altGogdlBin", "addDesktopShortcuts"]);
        assert_eq!(map.keys().last().map(String::as_str), Some("enableResizableBar"));
    }

    #[test]
    fn contains_agrees_with_serialized_keys() {
        let scope = ConfigScope::Override(EntityId::new("mygame"));
        let payload = ConfigurationPayload::derive(&scope, &fields());
        let map = payload.to_map().unwrap();
        for field in FieldName::ALL {
            assert_eq!(payload.contains(*field), map.contains_key(field.as_str()), "{field}");
        }
    }

    #[test]
    fn get_reads_back_typed_values() {
        let mut fields = fields();
        fields.max_workers = 8;
        fields.custom_wine_paths = vec!["/opt/wine".to_string()];
        let payload = ConfigurationPayload::derive(&ConfigScope::Default, &fields);

        assert_eq!(payload.get(FieldName::MaxWorkers), Some(FieldValue::Integer(8)));
        assert_eq!(
            payload.get(FieldName::CustomWinePaths),
            Some(FieldValue::List(vec!["/opt/wine".to_string()]))
        );
        assert_eq!(
            payload.get(FieldName::WineVersion),
            Some(FieldValue::Wine(WineInstallation::default()))
        );
        assert_eq!(payload.get(FieldName::SavesPath), None);
    }

    #[test]
    fn clipboard_snapshot_leads_with_entity_and_title() {
        let entity = EntityId::new("mygame");
        let payload = ConfigurationPayload::derive(&ConfigScope::Override(entity.clone()), &fields());
        let json = ClipboardSnapshot::new(&entity, "My Game", &payload)
            .to_json()
            .unwrap();

        assert!(json.starts_with(r#"{"entityId":"mygame","title":"My Game","audioFix":false"#));
    }
}
