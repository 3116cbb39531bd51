//! Shared core types used across the settings and gateway layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity id that selects the process-wide default configuration.
pub const DEFAULT_ENTITY: &str = "default";

/// Identifier of a game or application that can carry overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved id of the global configuration.
    pub fn default_entity() -> Self {
        Self(DEFAULT_ENTITY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_ENTITY
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Configuration scope levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigScope {
    /// Process-wide defaults.
    Default,
    /// One entity's customization.
    Override(EntityId),
}

impl ConfigScope {
    /// Scope selected by an entity id; `"default"` is reserved for the global scope.
    pub fn for_entity(entity: &EntityId) -> Self {
        if entity.is_default() {
            ConfigScope::Default
        } else {
            ConfigScope::Override(entity.clone())
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigScope::Default)
    }

    /// Entity id the scope is persisted under.
    pub fn entity_id(&self) -> EntityId {
        match self {
            ConfigScope::Default => EntityId::default_entity(),
            ConfigScope::Override(entity) => entity.clone(),
        }
    }
}

/// Store backend that owns a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runner {
    /// Epic Games Store via legendary
    #[default]
    Legendary,
    /// GOG via gogdl
    Gog,
    /// Manually added application
    Sideload,
}

impl Runner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runner::Legendary => "legendary",
            Runner::Gog => "gog",
            Runner::Sideload => "sideload",
        }
    }
}

impl TryFrom<&str> for Runner {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "legendary" | "epic" => Ok(Runner::Legendary),
            "gog" | "gogdl" => Ok(Runner::Gog),
            "sideload" => Ok(Runner::Sideload),
            other => anyhow::bail!("Unknown runner: {}. Use legendary, gog or sideload", other),
        }
    }
}

/// Host operating system, used for native-executable flags and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}
