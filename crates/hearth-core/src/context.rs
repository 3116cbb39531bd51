//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::{LauncherConfig, paths};
use crate::gateway::LocalGateway;
use crate::types::Platform;

/// Facts about the host the settings defaults depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    user_home: PathBuf,
    platform: Platform,
}

impl Environment {
    pub fn new(user_home: PathBuf, platform: Platform) -> Self {
        Self {
            user_home,
            platform,
        }
    }

    pub fn user_home(&self) -> &Path {
        &self.user_home
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Placeholder prefix shown before the stored value arrives.
    pub fn default_wine_prefix(&self) -> String {
        self.user_home.join(".wine").to_string_lossy().to_string()
    }
}

/// Unified application context.
///
/// Frontends (CLI/TUI) create this once and derive the gateway and
/// environment from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    config_dir: PathBuf,
    store_dir: PathBuf,
    language: String,
    platform: Platform,
}

impl AppContext {
    /// Create a context with explicit paths.
    pub fn new(home_dir: PathBuf, config_dir: PathBuf, store_dir: PathBuf) -> Self {
        Self {
            home_dir,
            config_dir,
            store_dir,
            language: crate::i18n::DEFAULT_LANGUAGE.to_string(),
            platform: Platform::current(),
        }
    }

    /// Create a context with system defaults, honoring `hearth.toml`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let config_dir = dirs::config_dir()
            .map(|p| p.join("hearth"))
            .unwrap_or_else(|| home_dir.join(".config").join("hearth"));

        let config = LauncherConfig::load(&paths::launcher_config_path(&config_dir))?;
        Ok(Self::from_config(home_dir, config_dir, config))
    }

    /// Apply a parsed launcher config on top of the resolved directories.
    pub fn from_config(home_dir: PathBuf, config_dir: PathBuf, config: LauncherConfig) -> Self {
        let store_dir = config
            .store_dir
            .clone()
            .unwrap_or_else(|| paths::default_store_dir(&config_dir));
        let mut ctx = Self::new(home_dir, config_dir, store_dir);
        if let Some(language) = config.language {
            ctx.language = language;
        }
        ctx
    }

    pub fn with_store_dir(mut self, store_dir: PathBuf) -> Self {
        self.store_dir = store_dir;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Get the environment used to seed field defaults.
    pub fn environment(&self) -> Environment {
        Environment::new(self.home_dir.clone(), self.platform)
    }

    /// Get a file-backed gateway over the store directory.
    pub fn local_gateway(&self) -> LocalGateway {
        LocalGateway::new(self.store_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wine_prefix_lives_under_home() {
        let env = Environment::new(PathBuf::from("/home/player"), Platform::Linux);
        assert_eq!(env.default_wine_prefix(), "/home/player/.wine");
    }

    #[test]
    fn config_overrides_store_dir_and_language() {
        let config = LauncherConfig {
            store_dir: Some(PathBuf::from("/data/hearth")),
            language: Some("de".to_string()),
        };
        let ctx = AppContext::from_config(
            PathBuf::from("/home/player"),
            PathBuf::from("/home/player/.config/hearth"),
            config,
        );
        assert_eq!(ctx.store_dir(), Path::new("/data/hearth"));
        assert_eq!(ctx.language(), "de");
    }

    #[test]
    fn store_dir_defaults_under_config_dir() {
        let ctx = AppContext::from_config(
            PathBuf::from("/home/player"),
            PathBuf::from("/home/player/.config/hearth"),
            LauncherConfig::default(),
        );
        assert_eq!(
            ctx.store_dir(),
            Path::new("/home/player/.config/hearth/store")
        );
        assert_eq!(ctx.language(), "en");
    }
}
