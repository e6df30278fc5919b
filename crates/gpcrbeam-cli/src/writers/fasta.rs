//! FASTA writer
//!
//! # Format
//! ```text
//! >{accession} {name without markup}
//! {sequence wrapped at 60 chars}
//! ```

use crate::api::Receptor;
use crate::error::Result;
use crate::writers::{stage, write_atomically, StagedFile};
use std::io::Write;
use std::path::Path;

/// Residues per sequence line
pub const LINE_WIDTH: usize = 60;

/// Placeholder written when a receptor has no sequence
pub const UNKNOWN_SEQUENCE: &str = "unknown";

/// Header line (without the leading `>`) for one receptor
fn header(receptor: &Receptor) -> String {
    let id = single_line(&receptor.accession);
    let description = single_line(&receptor.name_text());

    match (id.is_empty(), description.is_empty()) {
        (_, true) => id,
        (true, false) => description,
        (false, false) => format!("{} {}", id, description),
    }
}

/// FASTA headers must stay on one line
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// Render one receptor as a FASTA record, trailing newline included
pub fn fasta_record(receptor: &Receptor) -> String {
    let sequence = if receptor.sequence.is_empty() {
        UNKNOWN_SEQUENCE
    } else {
        receptor.sequence.as_str()
    };

    let mut record = format!(">{}\n", header(receptor));
    let residues: Vec<char> = sequence.chars().collect();
    for line in residues.chunks(LINE_WIDTH) {
        record.extend(line.iter());
        record.push('\n');
    }
    record
}

/// Write every receptor, in order, to `writer`. Returns the record count.
pub fn write_fasta_to<W: Write>(mut writer: W, receptors: &[Receptor]) -> Result<usize> {
    for receptor in receptors {
        writer.write_all(fasta_record(receptor).as_bytes())?;
    }
    writer.flush()?;
    Ok(receptors.len())
}

/// Render the FASTA for `path` into a staged temp file. Returns the record count.
pub fn stage_fasta(path: &Path, receptors: &[Receptor]) -> Result<(StagedFile, usize)> {
    stage(path, |writer| write_fasta_to(writer, receptors))
}

/// Rebuild the FASTA file at `path` from `receptors`
pub fn write_fasta(path: &Path, receptors: &[Receptor]) -> Result<usize> {
    write_atomically(path, |writer| write_fasta_to(writer, receptors))
}
