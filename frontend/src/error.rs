use std::path::PathBuf;

use harness_core::error::{CoreError, HarnessError, HostError};
use thiserror::Error;

use crate::rom_path::RomLoadError;
use crate::screenshot::ScreenshotError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigInvalid {
        path: PathBuf,
        source: HostError,
    },

    #[error("failed to load ROM: {0}")]
    Rom(#[from] RomLoadError),

    #[error("failed to start core: {0}")]
    Core(#[from] CoreError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error("failed to write screenshot {}: {source}", .path.display())]
    Screenshot {
        path: PathBuf,
        source: ScreenshotError,
    },
}
