//! Launcher configuration (`hearth.toml`).
//!
//! This is the launcher's own bootstrap config: where the settings store
//! lives and which language labels use. Game and global settings live in the
//! store itself and are read through the gateway.

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use paths::settings_path_for_entity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Directory holding `config.json`, `GamesConfig/` and `library.json`
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// UI language code, e.g. "en" or "de"
    #[serde(default)]
    pub language: Option<String>,
}

impl LauncherConfig {
    /// Load the config, returning defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: LauncherConfig =
            toml::from_str(content).map_err(|e| anyhow::anyhow!("TOML parsing error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(store_dir) = &self.store_dir
            && !store_dir.is_absolute()
        {
            anyhow::bail!(
                "store_dir must be an absolute path, got: {}",
                store_dir.display()
            );
        }
        if let Some(language) = &self.language
            && language.trim().is_empty()
        {
            anyhow::bail!("language must not be empty");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize launcher config to TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_full_config() {
        let config = LauncherConfig::parse(
            r#"
store_dir = "/data/hearth"
language = "de"
"#,
        )
        .unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/data/hearth")));
        assert_eq!(config.language.as_deref(), Some("de"));
    }

    #[test]
    fn relative_store_dir_is_rejected() {
        let err = LauncherConfig::parse(r#"store_dir = "relative/store""#).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = LauncherConfig::load(Path::new("/nonexistent/hearth.toml")).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "language = \"fr\"").unwrap();
        let config = LauncherConfig::load(file.path()).unwrap();
        assert_eq!(config.language.as_deref(), Some("fr"));
        assert!(config.store_dir.is_none());
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = LauncherConfig {
            store_dir: Some(PathBuf::from("/data/hearth")),
            language: Some("pt-BR".to_string()),
        };
        let parsed = LauncherConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
