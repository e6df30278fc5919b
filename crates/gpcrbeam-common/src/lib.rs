//! GPCRBeam Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, error handling and logging for the GPCRBeam workspace.
//!
//! - **Classes**: the GPCRdb receptor class taxonomy and user-input normalization
//! - **Error Handling**: [`GpcrError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary

pub mod classes;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use classes::{ClassFilter, GpcrClass};
pub use error::{GpcrError, Result};
