//! Configuration management
//!
//! Values come from an optional `dashdeck.toml` and are then overridden by
//! `DASHDECK_*` environment variables (`DASHDECK_LOGGING__LEVEL=debug`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::{Theme, View};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How a new session starts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Page opened first
    #[serde(default)]
    pub start_view: View,

    #[serde(default)]
    pub theme: Theme,
}

/// Where seed files and exports live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project root; data goes under `<root>/.dashdeck`
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "dashdeck.toml";
    pub const ENV_PREFIX: &'static str = "DASHDECK";

    /// Loads `dashdeck.toml` from the working directory if present
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds invalid values.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Loads from an explicit file path, which may be missing
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.session.start_view, View::Dashboard);
        assert_eq!(config.session.theme, Theme::Light);
        assert_eq!(config.storage.root, PathBuf::from("."));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashdeck.toml");
        std::fs::write(
            &path,
            r#"
[session]
start_view = "kanban"
theme = "dark"

[storage]
root = "/tmp/dashdeck"

[logging]
json = true
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.session.start_view, View::Kanban);
        assert_eq!(config.session.theme, Theme::Dark);
        assert_eq!(config.storage.root, PathBuf::from("/tmp/dashdeck"));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashdeck.toml");
        std::fs::write(&path, "[session]\ntheme = \"sepia\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
