//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod classes;
pub mod pull;
