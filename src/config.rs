//! # Configuration Management Module
//!
//! Persistent settings stored in platform-appropriate locations.
//! Handles loading, saving, and providing defaults for configuration options.
//!
//! ## Settings
//! - `glucose_display_units`: `"mg/dL"` or `"mmol/L"`
//! - `looper_id`: Looper the glance follows (unset means "needs configuration")
//! - `loopers_path`: TOML file holding `[[loopers]]` accounts
//! - `samples_dir`: Directory with one `<looper id>.toml` sample file per looper
//! - `follow`: Keep running and refresh whenever the refresh policy comes due
//!
//! ## Storage Location
//! - macOS: ~/Library/Application Support/glucose-glance/config.toml
//! - Linux: ~/.config/glucose-glance/config.toml
//! - Windows: %APPDATA%\glucose-glance\config.toml

use crate::error::ConfigError;
use crate::units::GlucoseDisplayUnits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings a single timeline cycle reads: the looper chosen for the widget
/// and the units to show it in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfiguration {
    pub looper_id: Option<String>,
    #[serde(default)]
    pub glucose_display_units: GlucoseDisplayUnits,
}

impl WidgetConfiguration {
    pub fn for_looper(looper_id: impl Into<String>) -> Self {
        Self {
            looper_id: Some(looper_id.into()),
            glucose_display_units: GlucoseDisplayUnits::default(),
        }
    }

    pub fn with_units(mut self, glucose_display_units: GlucoseDisplayUnits) -> Self {
        self.glucose_display_units = glucose_display_units;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub glucose_display_units: GlucoseDisplayUnits,
    pub looper_id: Option<String>,
    pub loopers_path: PathBuf,
    pub samples_dir: PathBuf,
    pub follow: bool,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = Self::app_dir();
        Self {
            glucose_display_units: GlucoseDisplayUnits::MilligramsPerDeciliter,
            looper_id: None,
            loopers_path: app_dir.join("loopers.toml"),
            samples_dir: app_dir.join("samples"),
            follow: false,
        }
    }
}

impl Config {
    fn app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glucose-glance")
    }

    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }

    /// Load config from the default location, or create default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the default there if the file is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = toml::from_str(&contents)
                    .map_err(ConfigError::ParseFailed)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, writing defaults", path.display());
                let config = Self::default();
                config.save_to(path)?;
                Ok(config)
            }
            Err(e) => Err(ConfigError::ReadFailed(e)),
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(ConfigError::WriteFailed)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeFailed)?;
        fs::write(path, toml_string)
            .map_err(ConfigError::WriteFailed)?;

        Ok(())
    }

    pub fn widget_configuration(&self) -> WidgetConfiguration {
        WidgetConfiguration {
            looper_id: self.looper_id.clone(),
            glucose_display_units: self.glucose_display_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.glucose_display_units, GlucoseDisplayUnits::MilligramsPerDeciliter);
        assert_eq!(config.looper_id, None);
        assert_eq!(config.follow, false);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            glucose_display_units: GlucoseDisplayUnits::MillimolesPerLiter,
            looper_id: Some("kid-1".to_string()),
            loopers_path: PathBuf::from("/tmp/loopers.toml"),
            samples_dir: PathBuf::from("/tmp/samples"),
            follow: true,
        };

        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        assert!(toml_str.contains(r#"glucose_display_units = "mmol/L""#));
        assert!(toml_str.contains(r#"looper_id = "kid-1""#));
        assert!(toml_str.contains("follow = true"));
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let toml_str = r#"
            looper_id = "kid-2"
        "#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.looper_id.as_deref(), Some("kid-2"));
        assert_eq!(config.glucose_display_units, GlucoseDisplayUnits::MilligramsPerDeciliter);
        assert_eq!(config.widget_configuration(), WidgetConfiguration::for_looper("kid-2"));
    }

    #[test]
    fn test_widget_configuration_carries_units() {
        let mut config = Config::default();
        config.looper_id = Some("kid-4".to_string());
        config.glucose_display_units = GlucoseDisplayUnits::MillimolesPerLiter;

        let widget = config.widget_configuration();
        assert_eq!(widget.looper_id.as_deref(), Some("kid-4"));
        assert_eq!(widget.glucose_display_units, GlucoseDisplayUnits::MillimolesPerLiter);
    }

    #[test]
    fn test_config_load_creates_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(config.looper_id, None);
        assert!(path.exists());
    }

    #[test]
    fn test_config_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.looper_id = Some("kid-3".to_string());
        config.glucose_display_units = GlucoseDisplayUnits::MillimolesPerLiter;
        config.save_to(&path).expect("Failed to save config");

        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded.looper_id.as_deref(), Some("kid-3"));
        assert_eq!(loaded.glucose_display_units, GlucoseDisplayUnits::MillimolesPerLiter);
    }

    #[test]
    fn test_config_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "follow = \"sometimes\"").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }
}
