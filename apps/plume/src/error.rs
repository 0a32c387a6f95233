//! Errors from the app layer (CLI, config, server startup).

use plume_core::PlumeError;
use thiserror::Error;

/// App-level failures surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum AppError {
    /// File or network I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The config file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The seed file could not be parsed or violated store invariants.
    #[error("seed error: {0}")]
    Seed(String),
}

impl From<PlumeError> for AppError {
    fn from(err: PlumeError) -> Self {
        Self::Seed(err.to_string())
    }
}
