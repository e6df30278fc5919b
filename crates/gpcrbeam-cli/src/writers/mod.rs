//! Output file writers
//!
//! Each writer can target any `io::Write` (for tests and piping) or a path. Path
//! writes are staged in a temporary file next to the destination; [`commit_all`]
//! then moves every staged file into place together. A failed write or commit
//! leaves the existing files untouched.

pub mod fasta;
pub mod metadata;

pub use fasta::{stage_fasta, write_fasta, write_fasta_to};
pub use metadata::{stage_metadata, write_metadata, write_metadata_to};

use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = ".gpcrbeam-";

/// Complete output waiting in a temp file to replace `target`
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Destination this file will be committed to
    pub fn target(&self) -> &Path {
        &self.target
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write the content for `path` into a temp file in the same directory
pub(crate) fn stage<T, F>(path: &Path, fill: F) -> Result<(StagedFile, T)>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<T>,
{
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".partial")
        .tempfile_in(parent_dir(path))?;

    let value = {
        let mut writer = BufWriter::new(&mut temp);
        let value = fill(&mut writer)?;
        writer.flush()?;
        value
    };

    temp.as_file().sync_all()?;
    Ok((
        StagedFile {
            temp,
            target: path.to_path_buf(),
        },
        value,
    ))
}

/// Previous content of a target, moved aside while the commit runs
struct Backup {
    target: PathBuf,
    saved: TempPath,
}

/// Move every staged file into place, or none of them
///
/// Existing targets are renamed to backups first; if any rename fails the
/// backups are restored and new targets removed. Backups are deleted on success.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<()> {
    for file in &staged {
        if file.target.exists() && !file.target.is_file() {
            return Err(CliError::Io(io::Error::other(format!(
                "{} exists and is not a regular file",
                file.target.display()
            ))));
        }
    }

    let mut backups = Vec::new();
    for file in &staged {
        if !file.target.exists() {
            continue;
        }
        match move_aside(&file.target) {
            Ok(backup) => backups.push(backup),
            Err(e) => {
                restore(&backups, &[]);
                return Err(e);
            },
        }
    }

    let mut committed = Vec::new();
    for file in staged {
        let target = file.target;
        if let Err(e) = file.temp.persist(&target) {
            restore(&backups, &committed);
            return Err(CliError::Io(e.error));
        }
        debug!(path = %target.display(), "Committed output file");
        committed.push(target);
    }

    Ok(())
}

fn move_aside(target: &Path) -> Result<Backup> {
    let saved = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".backup")
        .tempfile_in(parent_dir(target))?
        .into_temp_path();
    fs::rename(target, &saved)?;
    Ok(Backup {
        target: target.to_path_buf(),
        saved,
    })
}

/// Undo a partial commit: drop new files, then put the old ones back
fn restore(backups: &[Backup], committed: &[PathBuf]) {
    for target in committed {
        if let Err(e) = fs::remove_file(target) {
            warn!(path = %target.display(), error = %e, "Failed to remove new output during rollback");
        }
    }
    for backup in backups {
        if let Err(e) = fs::rename(&backup.saved, &backup.target) {
            warn!(path = %backup.target.display(), error = %e, "Failed to restore previous output");
        }
    }
}

/// Write `path` atomically: `fill` writes into a temp file that replaces `path` on success
pub(crate) fn write_atomically<T, F>(path: &Path, fill: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<T>,
{
    let (staged, value) = stage(path, fill)?;
    commit_all(vec![staged])?;
    Ok(value)
}
