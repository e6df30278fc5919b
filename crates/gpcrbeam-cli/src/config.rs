//! Configuration management for the GPCRBeam CLI
//!
//! Resolves the GPCRdb base URL, default data directory and HTTP settings from
//! built-in defaults overlaid with `GPCRBEAM_*` environment variables. A `.env`
//! file in the working directory is loaded by the binary before this runs.

use crate::api::retry::DEFAULT_BACKOFF_FACTOR;
use crate::api::ClientConfig;
use crate::error::{CliError, Result};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Public GPCRdb REST API root
pub const DEFAULT_BASE_URL: &str = "https://gpcrdb.org/services";

/// Default directory for raw downloads, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data/raw";

/// Default per-attempt HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base backoff delay in seconds
pub const DEFAULT_BACKOFF_SECS: f64 = 2.0;

/// CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// GPCRdb API base URL
    pub base_url: String,

    /// Directory that receives downloaded datasets
    pub data_dir: PathBuf,

    /// Per-attempt HTTP timeout in seconds
    pub timeout_secs: f64,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Base delay before the first retry; doubles on each further retry
    pub backoff_secs: f64,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_secs: DEFAULT_BACKOFF_SECS,
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("GPCRBEAM_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(dir) = std::env::var("GPCRBEAM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(raw) = std::env::var("GPCRBEAM_TIMEOUT_SECS") {
            config.timeout_secs = parse_timeout(&raw)?;
        }

        if let Ok(raw) = std::env::var("GPCRBEAM_MAX_RETRIES") {
            config.max_retries = raw.trim().parse().map_err(|_| {
                CliError::config(format!("GPCRBEAM_MAX_RETRIES must be a whole number, got '{}'", raw))
            })?;
        }

        if let Ok(raw) = std::env::var("GPCRBEAM_BACKOFF_SECS") {
            config.backoff_secs = match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs >= 0.0 => secs,
                _ => {
                    return Err(CliError::config(format!(
                        "GPCRBEAM_BACKOFF_SECS must be zero or a positive number, got '{}'",
                        raw
                    )))
                },
            };
        }

        Ok(config)
    }

    /// GPCRdb client settings, with CLI overrides applied on top
    pub fn client_config(
        &self,
        base_url: Option<String>,
        timeout_secs: Option<f64>,
        max_retries: Option<u32>,
    ) -> ClientConfig {
        ClientConfig::new(base_url.unwrap_or_else(|| self.base_url.clone()))
            .with_timeout_secs(timeout_secs.unwrap_or(self.timeout_secs))
            .with_max_retries(max_retries.unwrap_or(self.max_retries))
            .with_backoff_factor(
                Duration::try_from_secs_f64(self.backoff_secs).unwrap_or(DEFAULT_BACKOFF_FACTOR),
            )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a timeout in seconds; must be finite and positive
pub fn parse_timeout(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(CliError::config(format!(
            "timeout must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}
