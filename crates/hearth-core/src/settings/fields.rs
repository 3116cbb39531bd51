//! Field catalog and the static scope membership table.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::wine::WineInstallation;
use crate::error::{Result, SettingsError};
use crate::types::ConfigScope;

/// Value kind of a settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Text,
    Integer,
    List,
    Wine,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "boolean",
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::List => "list",
            FieldKind::Wine => "wine installation",
        };
        f.write_str(name)
    }
}

impl FieldKind {
    /// Whether a stored JSON value has this kind's shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value.is_i64(),
            FieldKind::List => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Wine => WineInstallation::deserialize(value).is_ok(),
        }
    }
}

/// Which scopes a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Only meaningful for the process-wide defaults.
    Global,
    /// Only meaningful for a single entity.
    Override,
    /// Fallback under `Default`, per-entity exception under `Override`.
    Both,
    /// Computed from the environment, never written back.
    Derived,
}

impl Membership {
    pub fn allowed_in(&self, scope: &ConfigScope) -> bool {
        match self {
            Membership::Global => scope.is_default(),
            Membership::Override => !scope.is_default(),
            Membership::Both => true,
            Membership::Derived => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Membership::Global => "global",
            Membership::Override => "override",
            Membership::Both => "both",
            Membership::Derived => "derived",
        }
    }
}

macro_rules! field_catalog {
    ($($variant:ident => $wire:literal, $kind:ident, $membership:ident;)+) => {
        /// Every configurable or derived settings field, named as on the wire.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum FieldName {
            $($variant,)+
        }

        impl FieldName {
            pub const ALL: &'static [FieldName] = &[$(FieldName::$variant,)+];

            /// camelCase key used in payloads and stored records.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(FieldName::$variant => $wire,)+
                }
            }

            pub fn kind(&self) -> FieldKind {
                match self {
                    $(FieldName::$variant => FieldKind::$kind,)+
                }
            }

            pub fn membership(&self) -> Membership {
                match self {
                    $(FieldName::$variant => Membership::$membership,)+
                }
            }
        }

        impl TryFrom<&str> for FieldName {
            type Error = SettingsError;

            fn try_from(value: &str) -> Result<Self> {
                match value {
                    $($wire => Ok(FieldName::$variant),)+
                    other => Err(SettingsError::UnknownField(other.to_string())),
                }
            }
        }
    };
}

field_catalog! {
    AddDesktopShortcuts => "addDesktopShortcuts", Bool, Global;
    AddStartMenuShortcuts => "addStartMenuShortcuts", Bool, Global;
    AltGogdlBin => "altGogdlBin", Text, Global;
    AltLegendaryBin => "altLegendaryBin", Text, Global;
    CustomWinePaths => "customWinePaths", List, Global;
    DarkTrayIcon => "darkTrayIcon", Bool, Global;
    DefaultInstallPath => "defaultInstallPath", Text, Global;
    DefaultWinePrefix => "defaultWinePrefix", Text, Global;
    DisableController => "disableController", Bool, Global;
    DiscordRpc => "discordRPC", Bool, Global;
    EgsLinkedPath => "egsLinkedPath", Text, Global;
    ExitToTray => "exitToTray", Bool, Global;
    MaxRecentGames => "maxRecentGames", Integer, Global;
    MaxWorkers => "maxWorkers", Integer, Global;
    MinimizeOnLaunch => "minimizeOnLaunch", Bool, Global;
    ShowUnrealMarket => "showUnrealMarket", Bool, Global;
    StartInTray => "startInTray", Bool, Global;
    AutoSyncSaves => "autoSyncSaves", Bool, Override;
    LauncherArgs => "launcherArgs", Text, Override;
    MaxSharpness => "maxSharpness", Integer, Override;
    OfflineMode => "offlineMode", Bool, Override;
    SavesPath => "savesPath", Text, Override;
    TargetExe => "targetExe", Text, Override;
    UseSteamRuntime => "useSteamRuntime", Bool, Override;
    AudioFix => "audioFix", Bool, Both;
    AutoInstallDxvk => "autoInstallDxvk", Bool, Both;
    AutoInstallVkd3d => "autoInstallVkd3d", Bool, Both;
    EnableEsync => "enableEsync", Bool, Both;
    EnableFsr => "enableFSR", Bool, Both;
    EnableFsync => "enableFsync", Bool, Both;
    EnableResizableBar => "enableResizableBar", Bool, Both;
    NvidiaPrime => "nvidiaPrime", Bool, Both;
    OtherOptions => "otherOptions", Text, Both;
    ShowFps => "showFps", Bool, Both;
    ShowMangohud => "showMangohud", Bool, Both;
    UseGameMode => "useGameMode", Bool, Both;
    WineCrossoverBottle => "wineCrossoverBottle", Text, Both;
    WinePrefix => "winePrefix", Text, Both;
    WineVersion => "wineVersion", Wine, Both;
    CanRunOffline => "canRunOffline", Bool, Derived;
    IsLinuxNative => "isLinuxNative", Bool, Derived;
    IsMacNative => "isMacNative", Bool, Derived;
}

impl FieldName {
    /// Fields persisted for the given scope, in catalog order.
    pub fn for_scope(scope: &ConfigScope) -> impl Iterator<Item = FieldName> + '_ {
        Self::ALL
            .iter()
            .copied()
            .filter(move |field| field.membership().allowed_in(scope))
    }

    pub fn is_derived(&self) -> bool {
        self.membership() == Membership::Derived
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Integer(i64),
    List(Vec<String>),
    Wine(WineInstallation),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Wine(_) => FieldKind::Wine,
        }
    }

    /// Parse user input for `field`.
    ///
    /// Booleans accept `true/false/on/off/yes/no/1/0`, lists accept either a
    /// JSON array or comma-separated entries, and Wine installations accept a
    /// JSON object.
    pub fn parse(field: FieldName, input: &str) -> Result<Self> {
        let invalid = |reason: String| SettingsError::InvalidValue { field, reason };
        match field.kind() {
            FieldKind::Bool => match input.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "off" | "no" | "0" => Ok(FieldValue::Bool(false)),
                other => Err(invalid(format!("'{other}' is not a boolean"))),
            },
            FieldKind::Text => Ok(FieldValue::Text(input.to_string())),
            FieldKind::Integer => input
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| invalid(e.to_string())),
            FieldKind::List => {
                let trimmed = input.trim();
                if trimmed.starts_with('[') {
                    serde_json::from_str::<Vec<String>>(trimmed)
                        .map(FieldValue::List)
                        .map_err(|e| invalid(e.to_string()))
                } else {
                    Ok(FieldValue::List(
                        trimmed
                            .split(',')
                            .map(str::trim)
                            .filter(|entry| !entry.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ))
                }
            }
            FieldKind::Wine => serde_json::from_str::<WineInstallation>(input)
                .map(FieldValue::Wine)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(value) => Value::Bool(*value),
            FieldValue::Text(value) => Value::String(value.clone()),
            FieldValue::Integer(value) => Value::from(*value),
            FieldValue::List(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Wine(wine) => serde_json::to_value(wine).unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Text(value) if value.is_empty() => f.write_str("\"\""),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::List(values) if values.is_empty() => f.write_str("[]"),
            FieldValue::List(values) => f.write_str(&values.join(", ")),
            FieldValue::Wine(wine) => write!(f, "{wine}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    #[test]
    fn wire_names_round_trip() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::try_from(field.as_str()).unwrap(), *field);
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = FieldName::try_from("notAField").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownField(name) if name == "notAField"));
    }

    #[test]
    fn derived_fields_belong_to_no_scope() {
        let override_scope = ConfigScope::Override(EntityId::new("mygame"));
        for field in [
            FieldName::CanRunOffline,
            FieldName::IsLinuxNative,
            FieldName::IsMacNative,
        ] {
            assert!(!field.membership().allowed_in(&ConfigScope::Default));
            assert!(!field.membership().allowed_in(&override_scope));
        }
    }

    #[test]
    fn scopes_overlap_only_on_shared_fields() {
        let override_scope = ConfigScope::Override(EntityId::new("mygame"));
        let global: Vec<_> = FieldName::for_scope(&ConfigScope::Default).collect();
        let game: Vec<_> = FieldName::for_scope(&override_scope).collect();

        assert!(global.contains(&FieldName::MaxWorkers));
        assert!(!game.contains(&FieldName::MaxWorkers));
        assert!(game.contains(&FieldName::SavesPath));
        assert!(!global.contains(&FieldName::SavesPath));

        for field in global.iter().filter(|field| game.contains(field)) {
            assert_eq!(field.membership(), Membership::Both);
        }
    }

    #[test]
    fn parse_bool_variants() {
        assert_eq!(
            FieldValue::parse(FieldName::AudioFix, "on").unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            FieldValue::parse(FieldName::AudioFix, "No").unwrap(),
            FieldValue::Bool(false)
        );
        assert!(FieldValue::parse(FieldName::AudioFix, "maybe").is_err());
    }

    #[test]
    fn parse_list_accepts_csv_and_json() {
        let csv = FieldValue::parse(FieldName::CustomWinePaths, "/opt/a, /opt/b,").unwrap();
        let json = FieldValue::parse(FieldName::CustomWinePaths, r#"["/opt/a","/opt/b"]"#).unwrap();
        assert_eq!(csv, json);
    }

    #[test]
    fn parse_integer_keeps_negative_values() {
        assert_eq!(
            FieldValue::parse(FieldName::MaxWorkers, "-3").unwrap(),
            FieldValue::Integer(-3)
        );
    }
}
