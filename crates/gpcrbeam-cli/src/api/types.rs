//! GPCRdb record types
//!
//! GPCRdb payloads are loosely typed and occasionally incomplete, so records are
//! normalized by hand rather than through a strict `Deserialize`: a missing or
//! oddly typed field degrades to an empty value instead of failing the batch.

use serde_json::{Map, Value};
use std::fmt;

/// Inline markup GPCRdb embeds in receptor names
const NAME_MARKUP_TAGS: [&str; 4] = ["<sub>", "</sub>", "<sup>", "</sup>"];

/// Normalized receptor record from the GPCRdb `receptorlist` endpoint
#[derive(Clone, PartialEq)]
pub struct Receptor {
    pub entry_name: String,
    /// Display name, may contain `<sub>`/`<sup>` markup
    pub name: String,
    pub accession: String,
    pub receptor_class: String,
    pub receptor_family: String,
    pub ligand_type: String,
    pub subfamily: String,
    pub endogenous_ligands: Vec<String>,
    pub species: String,
    pub sequence: String,
    /// Original payload, kept for diagnostics
    pub raw: Value,
}

impl Receptor {
    /// Normalize one API payload. Never fails.
    pub fn from_api(raw: &Value) -> Self {
        let empty = Map::new();
        let fields = raw.as_object().unwrap_or(&empty);
        let text = |key: &str| fields.get(key).map(coerce_string).unwrap_or_default();

        Self {
            entry_name: text("entry_name"),
            name: text("name"),
            accession: text("accession"),
            receptor_class: text("receptor_class"),
            receptor_family: text("receptor_family"),
            ligand_type: text("ligand_type"),
            subfamily: text("subfamily"),
            endogenous_ligands: fields
                .get("endogenous_ligands")
                .map(coerce_list)
                .unwrap_or_default(),
            species: text("species"),
            sequence: text("sequence"),
            raw: raw.clone(),
        }
    }

    /// Name with `<sub>`, `</sub>`, `<sup>` and `</sup>` removed
    pub fn name_text(&self) -> String {
        NAME_MARKUP_TAGS
            .iter()
            .fold(self.name.clone(), |name, tag| name.replace(tag, ""))
    }
}

impl fmt::Debug for Receptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receptor")
            .field("entry_name", &self.entry_name)
            .field("name", &self.name)
            .field("accession", &self.accession)
            .field("receptor_class", &self.receptor_class)
            .field("receptor_family", &self.receptor_family)
            .field("ligand_type", &self.ligand_type)
            .field("subfamily", &self.subfamily)
            .field("endogenous_ligands", &self.endogenous_ligands)
            .field("species", &self.species)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Render any JSON value as a plain string; `null` becomes empty
fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Render a JSON value as a list of strings; scalars become one-element lists
fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        scalar => vec![coerce_string(scalar)],
    }
}
