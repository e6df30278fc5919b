//! Error types for GPCRBeam

use thiserror::Error;

/// Result type alias for GPCRBeam operations
pub type Result<T> = std::result::Result<T, GpcrError>;

/// Main error type for GPCRBeam
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpcrError {
    /// One or more class tokens did not match any known class.
    ///
    /// All offending tokens are collected so the user can fix them in one go.
    #[error(
        "Invalid GPCR class(es): {}. Valid options are: {}",
        .invalid.join(", "),
        crate::classes::valid_options()
    )]
    InvalidClasses { invalid: Vec<String> },
}

impl GpcrError {
    /// Create an invalid classes error
    pub fn invalid_classes(invalid: Vec<String>) -> Self {
        Self::InvalidClasses { invalid }
    }
}
