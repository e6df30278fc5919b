//! Error types for the GPCRBeam CLI
//!
//! Every variant carries a message a user can act on; the binary prints it
//! verbatim and exits non-zero.

use gpcrbeam_common::GpcrError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Output directory (or other required path) is missing
    #[error("Improper config! {0} does not exist. Create the directory or pass a different --out-dir.")]
    NotFound(String),

    /// Output files already exist and overwriting was not requested
    #[error("{0} already contains outputs (use --overwrite).")]
    AlreadyExists(String),

    /// Transport failure, or retries exhausted
    #[error("Network request failed: {0}. Check your internet connection and the GPCRdb base URL.")]
    Network(String),

    /// GPCRdb answered with a status that is not worth retrying
    #[error("GPCRdb returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Response body was not the expected JSON
    #[error("Failed to decode GPCRdb response: {0}")]
    Decode(String),

    /// User input (class filter) failed validation
    #[error(transparent)]
    Validation(#[from] GpcrError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),
}

impl CliError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an already-exists error for a directory
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }
}
