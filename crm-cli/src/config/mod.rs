//! Persistent user configuration (~/.config/crm-cli/config.toml)

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tui::state::ThemeVariant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
    /// Width of the label column in record views
    #[serde(default = "default_label_width")]
    pub label_width: u16,
    /// Show field labels next to values; when off, labels become tooltips
    #[serde(default = "default_true")]
    pub show_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_min_suggestion_score")]
    pub min_suggestion_score: i64,
    /// Pre-assign columns whose header equals a field label
    #[serde(default = "default_true")]
    pub auto_match: bool,
}

fn default_label_width() -> u16 {
    18
}

fn default_true() -> bool {
    true
}

fn default_max_suggestions() -> usize {
    3
}

fn default_min_suggestion_score() -> i64 {
    40
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            label_width: default_label_width(),
            show_labels: true,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            min_suggestion_score: default_min_suggestion_score(),
            auto_match: true,
        }
    }
}

/// Application directory under the platform config dir
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crm-cli")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl Config {
    /// Load config from disk, falling back to defaults when the file is missing
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = config_path();
        std::fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[ui]\nlabel_width = 24\n").unwrap();
        assert_eq!(config.ui.label_width, 24);
        assert!(config.ui.show_labels);
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.ui.show_labels = false;
        config.ui.theme = ThemeVariant::Latte;
        config.import.max_suggestions = 5;

        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_toml("[ui]\nlabel_width = \"wide\"\n").is_err());
    }
}
