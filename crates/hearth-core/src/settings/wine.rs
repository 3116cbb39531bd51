//! Wine installation descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flavor of a Wine build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineKind {
    #[default]
    Wine,
    Proton,
    Crossover,
    Toolkit,
}

impl WineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WineKind::Wine => "wine",
            WineKind::Proton => "proton",
            WineKind::Crossover => "crossover",
            WineKind::Toolkit => "toolkit",
        }
    }
}

/// A Wine build the launcher can run games with.
///
/// Stored records may carry members this type does not name (`wineserver`,
/// `lib`, ...) or omit `type`. Both survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineInstallation {
    pub name: String,
    pub bin: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WineKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WineInstallation {
    /// An untyped installation is not Proton.
    pub fn is_proton(&self) -> bool {
        self.kind == Some(WineKind::Proton)
    }
}

impl Default for WineInstallation {
    fn default() -> Self {
        Self {
            name: "Wine Default".to_string(),
            bin: "/usr/bin/wine".to_string(),
            kind: Some(WineKind::Wine),
            extra: Map::new(),
        }
    }
}

impl fmt::Display for WineInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{} ({}, {})", self.name, kind.as_str(), self.bin),
            None => write!(f, "{} ({})", self.name, self.bin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_is_not_proton_and_stays_missing() {
        let wine: WineInstallation =
            serde_json::from_str(r#"{"name":"GE","bin":"/opt/ge/bin/wine"}"#).unwrap();
        assert_eq!(wine.kind, None);
        assert!(!wine.is_proton());

        let value = serde_json::to_value(&wine).unwrap();
        assert!(value.get("type").is_none());
    }

    #[test]
    fn unnamed_members_are_kept() {
        let stored = serde_json::json!({
            "name": "Wine-GE",
            "bin": "/opt/ge/bin/wine",
            "type": "wine",
            "wineserver": "/opt/ge/bin/wineserver",
            "lib": "/opt/ge/lib",
        });
        let wine: WineInstallation = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(wine.extra.len(), 2);
        assert_eq!(serde_json::to_value(&wine).unwrap(), stored);
    }

    #[test]
    fn kind_serializes_as_type() {
        let wine = WineInstallation {
            name: "Proton 8".to_string(),
            bin: "/steam/proton".to_string(),
            kind: Some(WineKind::Proton),
            extra: Map::new(),
        };
        let value = serde_json::to_value(&wine).unwrap();
        assert_eq!(value["type"], "proton");
    }
}
