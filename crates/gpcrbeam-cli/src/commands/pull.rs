//! `gpcrbeam dataset pull-sequences` command implementation
//!
//! Downloads the GPCRdb receptor list and writes a FASTA file plus `metadata.csv`.

use crate::api::{ClientConfig, GpcrdbClient, Receptor};
use crate::error::{CliError, Result};
use crate::progress;
use crate::writers::{commit_all, stage_fasta, stage_metadata};
use colored::Colorize;
use gpcrbeam_common::ClassFilter;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Name of the metadata file written next to the FASTA
pub const METADATA_FILE_NAME: &str = "metadata.csv";

/// Inputs for one pull
#[derive(Debug, Clone)]
pub struct PullOptions {
    /// Existing directory that receives the outputs
    pub out_dir: PathBuf,
    /// Classes to keep; empty keeps everything
    pub classes: ClassFilter,
    /// Replace existing outputs
    pub overwrite: bool,
    /// GPCRdb connection settings
    pub client: ClientConfig,
}

/// Summary of a finished pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Records written to the FASTA file
    pub n_sequences: usize,
    pub fasta_path: PathBuf,
    pub metadata_path: PathBuf,
    /// Receptors dropped because they had no accession
    pub n_skipped: usize,
}

/// FASTA and metadata paths for a directory and filter
pub fn output_paths(out_dir: &Path, classes: &ClassFilter) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("{}.fasta", classes.file_stem())),
        out_dir.join(METADATA_FILE_NAME),
    )
}

/// Fetch, filter and write GPCR sequences and metadata
///
/// The output directory and collision checks run before any network activity.
#[instrument(skip(options), fields(out_dir = %options.out_dir.display(), classes = %options.classes))]
pub async fn pull_gpcr_sequences(options: &PullOptions) -> Result<DownloadReport> {
    if !options.out_dir.is_dir() {
        return Err(CliError::not_found(options.out_dir.display().to_string()));
    }

    let (fasta_path, metadata_path) = output_paths(&options.out_dir, &options.classes);

    if !options.overwrite && (fasta_path.exists() || metadata_path.exists()) {
        return Err(CliError::already_exists(options.out_dir.display().to_string()));
    }

    let client = GpcrdbClient::new(options.client.clone())?;
    let receptors = client.get_receptor_list().await?;
    let fetched = receptors.len();

    let receptors = options
        .classes
        .apply(receptors, |receptor| receptor.receptor_class.as_str());
    let matched = receptors.len();

    let (receptors, skipped): (Vec<Receptor>, Vec<Receptor>) = receptors
        .into_iter()
        .partition(|receptor| !receptor.accession.is_empty());

    if !skipped.is_empty() {
        let entries: Vec<&str> = skipped.iter().map(|r| r.entry_name.as_str()).collect();
        warn!(
            count = skipped.len(),
            entries = ?entries,
            "Skipping receptors without an accession"
        );
    }

    // Both files are replaced together or not at all
    let (fasta_file, n_sequences) = stage_fasta(&fasta_path, &receptors)?;
    let (metadata_file, n_rows) = stage_metadata(&metadata_path, &receptors)?;
    commit_all(vec![fasta_file, metadata_file])?;

    info!(
        fetched = fetched,
        matched = matched,
        written = n_sequences,
        metadata_rows = n_rows,
        fasta = %fasta_path.display(),
        "Pull complete"
    );

    Ok(DownloadReport {
        n_sequences,
        fasta_path,
        metadata_path,
        n_skipped: skipped.len(),
    })
}

/// Run the pull and report to the terminal
pub async fn run(options: PullOptions) -> Result<()> {
    let spinner = progress::create_spinner(&format!(
        "Fetching receptors from {} ...",
        options.client.base_url()
    ));
    let result = pull_gpcr_sequences(&options).await;
    spinner.finish_and_clear();
    let report = result?;

    println!(
        "{} Wrote {} sequences to {} ({})",
        "✓".green(),
        report.n_sequences,
        report.fasta_path.display(),
        file_size(&report.fasta_path)
    );
    println!(
        "{} Wrote sequence metadata to {} ({})",
        "✓".green(),
        report.metadata_path.display(),
        file_size(&report.metadata_path)
    );
    if report.n_skipped > 0 {
        println!(
            "{} Skipped {} receptor(s) without an accession",
            "!".yellow(),
            report.n_skipped
        );
    }

    Ok(())
}

fn file_size(path: &Path) -> String {
    std::fs::metadata(path)
        .map(|m| progress::format_bytes(m.len()))
        .unwrap_or_else(|_| "size unknown".to_string())
}
