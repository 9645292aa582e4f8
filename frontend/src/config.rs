//! Desktop settings, read from a TOML file and overridden by CLI flags.

use std::path::{Path, PathBuf};

use harness_core::error::HostError;
use harness_core::video::present::{DEFAULT_SCALE, validate_scale};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const APP_DIR: &str = "nes-harness";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integer window scale.
    pub scale: u32,
    /// Pace presents to the display refresh.
    pub vsync: bool,
    /// Registered core to run.
    pub core: String,
    /// Where F12 screenshots go.
    pub screenshot_dir: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            vsync: true,
            core: "test-pattern".to_string(),
            screenshot_dir: dirs::picture_dir().unwrap_or_else(|| PathBuf::from(".")),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/nes-harness/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|source| AppError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), HostError> {
        validate_scale(self.scale)?;
        Ok(())
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
