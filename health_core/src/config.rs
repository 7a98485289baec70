//! Configuration file support for Health Alert.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/health-alert/config.toml`.
//! Every field is optional; a missing file means the defaults, which keep both
//! data files in the current working directory.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_reference_file")]
    pub reference_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: default_log_file(),
            reference_file: default_reference_file(),
        }
    }
}

impl DataConfig {
    /// Path of the symptom log
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }

    /// Path of the symptom reference document
    pub fn reference_path(&self) -> PathBuf {
        self.data_dir.join(&self.reference_file)
    }
}

/// Terminal presentation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    /// Wait for Enter after each action before redrawing the menu
    #[serde(default = "default_true")]
    pub pause_after_action: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            pause_after_action: true,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> String {
    "health_log.csv".into()
}

fn default_reference_file() -> String {
    "symptoms_db.json".into()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("health-alert").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.data.log_file.trim().is_empty() {
            return Err(Error::Config("data.log_file must not be empty".into()));
        }
        if self.data.reference_file.trim().is_empty() {
            return Err(Error::Config("data.reference_file must not be empty".into()));
        }
        if self.data.log_file == self.data.reference_file {
            return Err(Error::Config(
                "data.log_file and data.reference_file must differ".into(),
            ));
        }
        Ok(())
    }
}
