//! Configuration for ContourKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default location is
//! `<config dir>/contourkit/config.toml`.
//!
//! Configuration is organized into sections:
//! - Clearance heights used when rewriting retracts and plunges
//! - Input and output file locations

use contourkit_core::SafetyHeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Application directory under the platform config directory
const APP_DIR: &str = "contourkit";

/// Default config file name
const CONFIG_FILE: &str = "config.toml";

/// Serialized file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Input and output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Height profile (EPS path data, millimeters)
    pub profile: PathBuf,
    /// Flat ShopBot sketch
    pub sketch: PathBuf,
    /// Projected 3D sketch
    pub output: PathBuf,
    /// Optional CSV dump of the unit-converted profile table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_csv: Option<PathBuf>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            profile: PathBuf::from("Profile_Curve.eps"),
            sketch: PathBuf::from("STOS_Curves.sbp"),
            output: PathBuf::from("STOS_Curves_3D.sbp"),
            profile_csv: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clearance heights (inches)
    pub heights: SafetyHeights,
    /// File locations
    pub files: FileSettings,
}

impl Config {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load an explicit config file, else the default one if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.heights
            .validate()
            .map_err(|reason| SettingsError::InvalidSetting {
                key: "heights".to_string(),
                reason,
            })?;

        for (key, path) in [
            ("files.profile", &self.files.profile),
            ("files.sketch", &self.files.sketch),
            ("files.output", &self.files.output),
        ] {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
        }

        if self.files.output == self.files.sketch {
            return Err(SettingsError::InvalidSetting {
                key: "files.output".to_string(),
                reason: "output would overwrite the input sketch".to_string(),
            });
        }

        Ok(())
    }
}
