use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::tiles::MapLayer;

/// Top-level configuration stored on disk as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Overlay layer preselected on the map screen.
    pub default_layer: Option<String>,

    /// Cap on saved favorite cities. `None` means the stock limit of 5.
    pub favorite_limit: Option<usize>,
}

impl Config {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Return the default map layer as a strongly-typed value.
    pub fn default_layer(&self) -> Result<MapLayer> {
        match self.default_layer.as_deref() {
            None => Ok(MapLayer::Clouds),
            Some(s) => MapLayer::try_from(s),
        }
    }

    pub fn set_default_layer(&mut self, layer: MapLayer) {
        self.default_layer = Some(layer.slug().to_string());
    }

    pub fn favorite_limit(&self) -> usize {
        self.favorite_limit.unwrap_or(crate::favorites::DEFAULT_LIMIT)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Platform directories for config and favorite-city storage.
pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "skywatch", "skywatch")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_unconfigured() {
        let cfg = Config::default();
        assert!(!cfg.is_configured());
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn set_api_key_marks_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());

        assert!(cfg.is_configured());
        assert_eq!(cfg.api_key(), Some("OPEN_KEY"));
    }

    #[test]
    fn default_layer_falls_back_to_clouds() {
        let cfg = Config::default();
        assert_eq!(cfg.default_layer().expect("fallback layer"), MapLayer::Clouds);
    }

    #[test]
    fn default_layer_round_trips_through_slug() {
        let mut cfg = Config::default();
        cfg.set_default_layer(MapLayer::Wind);

        assert_eq!(cfg.default_layer.as_deref(), Some("wind_new"));
        assert_eq!(cfg.default_layer().expect("stored layer"), MapLayer::Wind);
    }

    #[test]
    fn unknown_stored_layer_is_an_error() {
        let cfg = Config {
            default_layer: Some("lava_new".to_string()),
            ..Config::default()
        };
        assert!(cfg.default_layer().is_err());
    }

    #[test]
    fn favorite_limit_defaults_to_five() {
        assert_eq!(Config::default().favorite_limit(), 5);
        let cfg = Config {
            favorite_limit: Some(3),
            ..Config::default()
        };
        assert_eq!(cfg.favorite_limit(), 3);
    }
}
