//! # Server Configuration
//!
//! Optional TOML config file for the server, with conservative defaults.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [limits]
//! rate_limit = 100
//! ```
//!
//! Environment variables (`PLUME_RATE_LIMIT`, `PLUME_CORS_ORIGINS`) win
//! over the file where both are set.

use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
}

/// Bind address settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Request limit settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Requests per second across all clients; 0 disables rate limiting.
    pub rate_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { rate_limit: 100 }
    }
}

impl Config {
    /// Load a config file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            AppError::Config(format!("cannot parse '{}': {}", path.display(), e))
        })
    }

    /// The socket address string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
