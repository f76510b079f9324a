//! Configuration for the assistant
//!
//! Settings come from an optional TOML file; command-line flags are applied
//! on top by the binary.

use crate::commands::DEFAULT_THRESHOLD;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "assistant-bot";
const CONFIG_FILE: &str = "config.toml";

/// Configuration structure for the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Directory holding the store files
    pub data_dir: Option<PathBuf>,

    /// Default window for the `birthdays` command
    pub birthday_window_days: u32,

    /// Minimum similarity a typo must exceed to be suggested
    pub fuzzy_threshold: f64,

    /// Colored output
    pub color: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            birthday_window_days: 7,
            fuzzy_threshold: DEFAULT_THRESHOLD,
            color: true,
        }
    }
}

impl AssistantConfig {
    /// Load from `path`, or from the default location if a file exists there,
    /// or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold < 1.0) {
            anyhow::bail!(
                "fuzzy_threshold must be between 0 and 1 (exclusive), got {}",
                self.fuzzy_threshold
            );
        }
        Ok(())
    }

    /// `<config_dir>/assistant-bot/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Configured data directory, else the platform data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".assistant-bot"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = AssistantConfig::default();
        assert_eq!(config.birthday_window_days, 7);
        assert!(config.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("config.toml");
        let config = AssistantConfig {
            data_dir: Some(dir.path().join("data")),
            birthday_window_days: 30,
            fuzzy_threshold: 0.6,
            color: false,
        };

        config.save(&path).unwrap();
        assert_eq!(AssistantConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "birthday_window_days = 14\n").unwrap();

        let config = AssistantConfig::from_file(&path).unwrap();
        assert_eq!(config.birthday_window_days, 14);
        assert_eq!(config.fuzzy_threshold, DEFAULT_THRESHOLD);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fuzzy_threshold = 1.5\n").unwrap();
        assert!(AssistantConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = AssistantConfig { data_dir: Some(PathBuf::from("/tmp/x")), ..Default::default() };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/x"));
    }
}
