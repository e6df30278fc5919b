//! GPCRBeam CLI Library
//!
//! Dataset tooling for GPCRBeam: pulls G-protein-coupled receptor sequences and
//! metadata from the GPCRdb REST API into local FASTA and CSV files.
//!
//! - **API client** with retry/backoff (`api`)
//! - **Writers** for FASTA and metadata CSV (`writers`)
//! - **Commands**: `gpcrbeam dataset pull-sequences`, `gpcrbeam dataset list-classes`

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod writers;

// Re-export commonly used types
pub use commands::pull::{pull_gpcr_sequences, DownloadReport, PullOptions};
pub use error::{CliError, Result};

use clap::{ArgAction, Parser, Subcommand};
use gpcrbeam_common::logging::{LogConfig, LogLevel, LogOutput};
use gpcrbeam_common::{ClassFilter, GpcrError};
use std::path::PathBuf;

/// GPCRBeam: an inference pipeline for determining the native G-protein coupling
/// of a GPCR protein based on sequence analysis.
#[derive(Parser, Debug)]
#[command(name = "gpcrbeam")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show version and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Debug-level logging on stderr (long form only; `-v` is --version)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print the full command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

impl Cli {
    /// Logging settings: defaults, then `GPCRBEAM_LOG_*`, then `--verbose`
    pub fn log_config(&self) -> LogConfig {
        let base = LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("gpcrbeam-cli")
            .build();

        let mut config = base.clone().merge_env().unwrap_or(base);
        if self.verbose {
            config.level = LogLevel::Debug;
        }
        config
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dataset creation commands
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },
}

/// Dataset subcommands
#[derive(Subcommand, Debug)]
pub enum DatasetCommand {
    /// Download GPCR sequences (FASTA) and metadata (CSV) from GPCRdb
    PullSequences {
        /// Set output directory (defaults to GPCRBEAM_DATA_DIR or data/raw)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Comma-separated list of GPCR classes to download (default: all)
        #[arg(long = "gpcr-classes", visible_alias = "gc", value_parser = parse_class_filter)]
        gpcr_classes: Option<ClassFilter>,

        /// Overwrite existing files
        #[arg(long, visible_alias = "ow")]
        overwrite: bool,

        /// HTTP timeout seconds
        #[arg(short = 't', long, value_parser = parse_timeout_arg)]
        timeout: Option<f64>,

        /// HTTP retries for 429/5xx
        #[arg(short = 'm', long)]
        max_retries: Option<u32>,

        /// GPCRdb API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List the accepted GPCR class codes
    ListClasses,
}

/// Parse and validate `--gpcr-classes`
fn parse_class_filter(raw: &str) -> std::result::Result<ClassFilter, GpcrError> {
    ClassFilter::parse(Some(raw))
}

/// Parse and validate `--timeout`
fn parse_timeout_arg(raw: &str) -> std::result::Result<f64, String> {
    config::parse_timeout(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gpcrbeam_common::GpcrClass;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pull_sequences_aliases() {
        let cli = Cli::try_parse_from([
            "gpcrbeam",
            "dataset",
            "pull-sequences",
            "--out-dir",
            "/tmp/out",
            "--gc",
            "a,B1,class a (rhodopsin)",
            "--ow",
            "-t",
            "5",
            "-m",
            "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Dataset {
                command:
                    DatasetCommand::PullSequences {
                        out_dir,
                        gpcr_classes,
                        overwrite,
                        timeout,
                        max_retries,
                        base_url,
                    },
            }) => {
                assert_eq!(out_dir, Some(PathBuf::from("/tmp/out")));
                assert_eq!(gpcr_classes.unwrap().classes(), &[GpcrClass::A, GpcrClass::B1]);
                assert!(overwrite);
                assert_eq!(timeout, Some(5.0));
                assert_eq!(max_retries, Some(2));
                assert_eq!(base_url, None);
            },
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_classes_rejected_at_parse_time() {
        let err = Cli::try_parse_from([
            "gpcrbeam",
            "dataset",
            "pull-sequences",
            "--gpcr-classes",
            "A,X9,nope",
        ])
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("X9, nope"));
        assert!(message.contains("Valid options are"));
    }

    #[test]
    fn test_short_v_prints_version() {
        let err = Cli::try_parse_from(["gpcrbeam", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let err = Cli::try_parse_from(["gpcrbeam", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_verbose_is_global_long_flag() {
        let cli = Cli::try_parse_from(["gpcrbeam", "dataset", "list-classes", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    // Single test so the env mutations never race each other
    #[test]
    fn test_verbose_overrides_log_level_env() {
        std::env::set_var("GPCRBEAM_LOG_LEVEL", "error");

        let quiet = Cli::try_parse_from(["gpcrbeam", "dataset", "list-classes"]).unwrap();
        assert_eq!(quiet.log_config().level, LogLevel::Error);

        let verbose = Cli::try_parse_from(["gpcrbeam", "--verbose", "dataset", "list-classes"]).unwrap();
        assert_eq!(verbose.log_config().level, LogLevel::Debug);

        std::env::set_var("GPCRBEAM_LOG_LEVEL", "not-a-level");
        assert_eq!(quiet.log_config().level, LogLevel::Warn);

        std::env::remove_var("GPCRBEAM_LOG_LEVEL");
        assert_eq!(quiet.log_config().level, LogLevel::Warn);
        assert_eq!(quiet.log_config().log_file_prefix, "gpcrbeam-cli");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["gpcrbeam", "dataset", "pull-sequences", "-t", "0"]).is_err());
    }
}
