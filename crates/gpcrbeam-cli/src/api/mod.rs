//! API client module
//!
//! HTTP client for the GPCRdb REST API.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod types;

pub use client::{ClientConfig, GpcrdbClient};
pub use retry::RetryPolicy;
pub use types::Receptor;
