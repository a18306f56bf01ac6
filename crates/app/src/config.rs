//! Application configuration
//!
//! A small TOML file controls where the data and uploads directories
//! live. A missing file just means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the JSON collection files
    pub data_dir: PathBuf,
    /// Directory holding uploaded profile pictures
    pub uploads_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        match ProjectDirs::from("dev", "inkpad", "inkpad") {
            Some(dirs) => Self {
                data_dir: dirs.data_dir().join("data"),
                uploads_dir: dirs.data_dir().join("uploads"),
            },
            None => Self {
                data_dir: PathBuf::from("data"),
                uploads_dir: PathBuf::from("static/uploads"),
            },
        }
    }
}

impl AppConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("dev", "inkpad", "inkpad") {
            Some(dirs) => dirs.config_dir().join("inkpad.toml"),
            None => PathBuf::from("inkpad.toml"),
        }
    }
}
