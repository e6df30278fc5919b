//! GPCRBeam CLI - Main entry point

use clap::Parser;
use gpcrbeam_cli::commands;
use gpcrbeam_cli::config::Config;
use gpcrbeam_cli::{Cli, Commands, DatasetCommand, PullOptions};
use gpcrbeam_common::logging::init_logging;
use gpcrbeam_common::ClassFilter;
use std::process;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Values from a local .env never override the real environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let log_config = cli.log_config();

    let Some(command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // The CLI works without logging, so a failed init is not fatal
    let guard = init_logging(&log_config).ok().flatten();

    let result = execute_command(command).await;

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        drop(guard);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(command: Commands) -> gpcrbeam_cli::Result<()> {
    match command {
        Commands::Dataset { command } => match command {
            DatasetCommand::PullSequences {
                out_dir,
                gpcr_classes,
                overwrite,
                timeout,
                max_retries,
                base_url,
            } => {
                let config = Config::from_env()?;
                let options = PullOptions {
                    out_dir: out_dir.unwrap_or_else(|| config.data_dir.clone()),
                    classes: gpcr_classes.unwrap_or_else(ClassFilter::all),
                    overwrite,
                    client: config.client_config(base_url, timeout, max_retries),
                };
                commands::pull::run(options).await
            },
            DatasetCommand::ListClasses => {
                commands::classes::run();
                Ok(())
            },
        },
    }
}
