//! Metadata CSV writer
//!
//! One row per receptor with an accession; receptors without one are skipped.

use crate::api::Receptor;
use crate::error::Result;
use crate::writers::{stage, write_atomically, StagedFile};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Fixed CSV header
pub const METADATA_HEADER: [&str; 9] = [
    "accession",
    "entry_name",
    "name",
    "receptor_class",
    "receptor_family",
    "ligand_type",
    "subfamily",
    "endogenous_ligands",
    "species",
];

/// Separator for the `endogenous_ligands` column
pub const LIGAND_SEPARATOR: &str = ";";

/// One CSV row; field order matches [`METADATA_HEADER`]
#[derive(Debug, Serialize)]
struct MetadataRow<'a> {
    accession: &'a str,
    entry_name: &'a str,
    name: String,
    receptor_class: &'a str,
    receptor_family: &'a str,
    ligand_type: &'a str,
    subfamily: &'a str,
    endogenous_ligands: String,
    species: &'a str,
}

impl<'a> From<&'a Receptor> for MetadataRow<'a> {
    fn from(receptor: &'a Receptor) -> Self {
        Self {
            accession: &receptor.accession,
            entry_name: &receptor.entry_name,
            name: receptor.name_text(),
            receptor_class: &receptor.receptor_class,
            receptor_family: &receptor.receptor_family,
            ligand_type: &receptor.ligand_type,
            subfamily: &receptor.subfamily,
            endogenous_ligands: receptor.endogenous_ligands.join(LIGAND_SEPARATOR),
            species: &receptor.species,
        }
    }
}

/// Write the header and one row per receptor with an accession. Returns rows written.
pub fn write_metadata_to<W: Write>(writer: W, receptors: &[Receptor]) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(METADATA_HEADER)?;

    let mut rows = 0;
    for receptor in receptors.iter().filter(|r| !r.accession.is_empty()) {
        csv_writer.serialize(MetadataRow::from(receptor))?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Render the metadata CSV for `path` into a staged temp file. Returns rows written.
pub fn stage_metadata(path: &Path, receptors: &[Receptor]) -> Result<(StagedFile, usize)> {
    stage(path, |writer| write_metadata_to(writer, receptors))
}

/// Rebuild the metadata CSV at `path` from `receptors`
pub fn write_metadata(path: &Path, receptors: &[Receptor]) -> Result<usize> {
    write_atomically(path, |writer| write_metadata_to(writer, receptors))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::writers::fasta::write_fasta_to;
    use serde_json::json;

    fn sample() -> Vec<Receptor> {
        vec![
            Receptor::from_api(&json!({
                "accession": "P21728",
                "entry_name": "drd1_human",
                "name": "D<sub>1</sub> receptor",
                "receptor_class": "Class A (Rhodopsin)",
                "receptor_family": "Aminergic receptors",
                "ligand_type": "Small molecule receptors",
                "subfamily": "Dopamine receptors",
                "endogenous_ligands": ["dopamine", "L-DOPA"],
                "species": "Homo sapiens"
            })),
            Receptor::from_api(&json!({ "entry_name": "orphan_x", "name": "no accession" })),
            Receptor::from_api(&json!({
                "accession": "Q13255",
                "entry_name": "grm1_human",
                "name": "mGlu1, \"metabotropic\"",
                "receptor_class": "Class C (Glutamate)"
            })),
        ]
    }

    fn render(receptors: &[Receptor]) -> (usize, String) {
        let mut buffer = Vec::new();
        let rows = write_metadata_to(&mut buffer, receptors).unwrap();
        (rows, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_header_is_fixed() {
        let (rows, csv_text) = render(&[]);
        assert_eq!(rows, 0);
        assert_eq!(
            csv_text,
            "accession,entry_name,name,receptor_class,receptor_family,ligand_type,subfamily,endogenous_ligands,species\n"
        );
    }

    #[test]
    fn test_rows_skip_missing_accession() {
        let (rows, csv_text) = render(&sample());
        let lines: Vec<&str> = csv_text.lines().collect();

        assert_eq!(rows, 2);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "P21728,drd1_human,D1 receptor,Class A (Rhodopsin),Aminergic receptors,Small molecule receptors,Dopamine receptors,dopamine;L-DOPA,Homo sapiens"
        );
        assert!(!csv_text.contains("orphan_x"));
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let (_, csv_text) = render(&sample());
        assert!(csv_text.contains(r#"Q13255,grm1_human,"mGlu1, ""metabotropic""",Class C (Glutamate),,,,,"#));
    }

    #[test]
    fn test_csv_and_fasta_counts_diverge_on_missing_accession() {
        let receptors = sample();
        let (rows, _) = render(&receptors);
        let records = write_fasta_to(Vec::new(), &receptors).unwrap();

        assert_eq!(records, 3);
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_csv_round_trips_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        write_metadata(&path, &sample()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), METADATA_HEADER.to_vec());

        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[7], "dopamine;L-DOPA");
    }
}
