//! GPCR class taxonomy
//!
//! GPCRdb labels every receptor with a class display name such as
//! `"Class A (Rhodopsin)"`. Users refer to classes by short code (`A`, `B1`, ...),
//! so this module owns the code <-> display-name table, the alias lookup used to
//! normalize user input, and the [`ClassFilter`] that joins the two taxonomies.
//!
//! # Example
//!
//! ```
//! use gpcrbeam_common::classes::{ClassFilter, GpcrClass};
//!
//! let filter = ClassFilter::parse(Some("a, class b1 (secretin),A")).unwrap();
//! assert_eq!(filter.classes(), &[GpcrClass::A, GpcrClass::B1]);
//! assert!(filter.matches("Class A (Rhodopsin)"));
//! assert!(!filter.matches("Class F (Frizzled)"));
//! ```

use crate::error::{GpcrError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// File stem used when no class filter is applied.
pub const ALL_CLASSES_STEM: &str = "all_classes";

/// A GPCRdb receptor class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpcrClass {
    A,
    B1,
    B2,
    C,
    D1,
    F,
    O1,
    O2,
    T2,
}

impl GpcrClass {
    /// Every class, in canonical table order
    pub const ALL: [GpcrClass; 9] = [
        GpcrClass::A,
        GpcrClass::B1,
        GpcrClass::B2,
        GpcrClass::C,
        GpcrClass::D1,
        GpcrClass::F,
        GpcrClass::O1,
        GpcrClass::O2,
        GpcrClass::T2,
    ];

    /// Short class code (e.g. `"B1"`)
    pub fn code(self) -> &'static str {
        match self {
            GpcrClass::A => "A",
            GpcrClass::B1 => "B1",
            GpcrClass::B2 => "B2",
            GpcrClass::C => "C",
            GpcrClass::D1 => "D1",
            GpcrClass::F => "F",
            GpcrClass::O1 => "O1",
            GpcrClass::O2 => "O2",
            GpcrClass::T2 => "T2",
        }
    }

    /// Class name exactly as GPCRdb reports it in `receptor_class`
    pub fn display_name(self) -> &'static str {
        match self {
            GpcrClass::A => "Class A (Rhodopsin)",
            GpcrClass::B1 => "Class B1 (Secretin)",
            GpcrClass::B2 => "Class B2 (Adhesion)",
            GpcrClass::C => "Class C (Glutamate)",
            GpcrClass::D1 => "Class D1 (Ste2-like fungal pheromone)",
            GpcrClass::F => "Class F (Frizzled)",
            GpcrClass::O1 => "Class O1 (fish-like odorant)",
            GpcrClass::O2 => "Class O2 (tetrapod specific odorant)",
            GpcrClass::T2 => "Class T2 (Taste 2)",
        }
    }

    /// Resolve a single user token through the alias table.
    ///
    /// Tries the token as given, then upper-cased, then lower-cased, so codes and
    /// display names are matched case-insensitively. Surrounding whitespace is ignored.
    pub fn from_alias(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        ALIASES
            .get(token)
            .or_else(|| ALIASES.get(token.to_uppercase().as_str()))
            .or_else(|| ALIASES.get(token.to_lowercase().as_str()))
            .copied()
    }
}

impl fmt::Display for GpcrClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Alias table: code, lowercase code and lowercase display name -> class
static ALIASES: LazyLock<HashMap<String, GpcrClass>> = LazyLock::new(|| {
    let mut aliases = HashMap::new();
    for class in GpcrClass::ALL {
        aliases.insert(class.code().to_string(), class);
        aliases.insert(class.code().to_lowercase(), class);
        aliases.insert(class.display_name().to_lowercase(), class);
    }
    aliases
});

/// Human-readable list of accepted classes, e.g. `"A: Class A (Rhodopsin), B1: ..."`
pub fn valid_options() -> String {
    GpcrClass::ALL
        .iter()
        .map(|c| format!("{}: {}", c.code(), c.display_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize a comma-separated list of class tokens.
///
/// Empty tokens (from `",,"` or trailing commas) are skipped. Duplicates collapse
/// onto their first occurrence. Every unrecognized token is reported together in a
/// single [`GpcrError::InvalidClasses`].
pub fn normalize_class_tokens(input: &str) -> Result<Vec<GpcrClass>> {
    let mut selected = Vec::new();
    let mut invalid = Vec::new();

    for token in input.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match GpcrClass::from_alias(token) {
            Some(class) => {
                if !selected.contains(&class) {
                    selected.push(class);
                }
            },
            None => invalid.push(token.to_string()),
        }
    }

    if !invalid.is_empty() {
        return Err(GpcrError::invalid_classes(invalid));
    }

    Ok(selected)
}

/// Selection of receptor classes to keep
///
/// An empty selection means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter {
    classes: Vec<GpcrClass>,
}

impl ClassFilter {
    /// A filter that keeps every receptor
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse user input; `None` or blank input yields [`ClassFilter::all`]
    pub fn parse(input: Option<&str>) -> Result<Self> {
        match input {
            Some(raw) if !raw.trim().is_empty() => Ok(Self {
                classes: normalize_class_tokens(raw)?,
            }),
            _ => Ok(Self::all()),
        }
    }

    /// Build a filter from already-resolved classes (deduplicated, order kept)
    pub fn from_classes(classes: impl IntoIterator<Item = GpcrClass>) -> Self {
        let mut selected = Vec::new();
        for class in classes {
            if !selected.contains(&class) {
                selected.push(class);
            }
        }
        Self { classes: selected }
    }

    /// Selected classes in first-seen order
    pub fn classes(&self) -> &[GpcrClass] {
        &self.classes
    }

    /// True when no class restriction applies
    pub fn is_all(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check a raw GPCRdb `receptor_class` value against the selection
    pub fn matches(&self, receptor_class: &str) -> bool {
        self.is_all()
            || self
                .classes
                .iter()
                .any(|class| class.display_name() == receptor_class)
    }

    /// Keep the items whose class (as extracted by `class_of`) matches
    pub fn apply<T, F>(&self, items: Vec<T>, class_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        if self.is_all() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(class_of(item))).collect()
    }

    /// Output file stem: `all_classes`, or the selected codes joined by `_`
    pub fn file_stem(&self) -> String {
        if self.is_all() {
            return ALL_CLASSES_STEM.to_string();
        }
        self.classes
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("all");
        }
        let codes: Vec<&str> = self.classes.iter().map(|c| c.code()).collect();
        f.write_str(&codes.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alias_forms_resolve_to_same_class() {
        for class in GpcrClass::ALL {
            assert_eq!(GpcrClass::from_alias(class.code()), Some(class));
            assert_eq!(GpcrClass::from_alias(&class.code().to_lowercase()), Some(class));
            assert_eq!(
                GpcrClass::from_alias(&class.display_name().to_lowercase()),
                Some(class)
            );
            assert_eq!(GpcrClass::from_alias(class.display_name()), Some(class));
        }
    }

    #[test]
    fn test_from_alias_rejects_unknown_and_blank() {
        assert_eq!(GpcrClass::from_alias("Z"), None);
        assert_eq!(GpcrClass::from_alias("class a"), None);
        assert_eq!(GpcrClass::from_alias("   "), None);
    }

    #[test]
    fn test_normalize_dedups_and_keeps_order() {
        let classes = normalize_class_tokens("f, A,,a ,class f (frizzled), B1,").unwrap();
        assert_eq!(classes, vec![GpcrClass::F, GpcrClass::A, GpcrClass::B1]);
    }

    #[test]
    fn test_normalize_reports_every_invalid_token() {
        let err = normalize_class_tokens("A,bogus,B1,nonsense").unwrap_err();
        assert_eq!(
            err,
            GpcrError::InvalidClasses {
                invalid: vec!["bogus".to_string(), "nonsense".to_string()]
            }
        );

        let message = err.to_string();
        assert!(message.contains("bogus, nonsense"));
        assert!(message.contains("A: Class A (Rhodopsin)"));
        assert!(message.contains("T2: Class T2 (Taste 2)"));
    }

    #[test]
    fn test_valid_options_lists_table_in_order() {
        let options = valid_options();
        assert!(options.starts_with("A: Class A (Rhodopsin), B1: Class B1 (Secretin)"));
        assert!(options.ends_with("T2: Class T2 (Taste 2)"));
    }

    #[test]
    fn test_filter_parse_empty_means_all() {
        assert!(ClassFilter::parse(None).unwrap().is_all());
        assert!(ClassFilter::parse(Some("")).unwrap().is_all());
        assert!(ClassFilter::parse(Some("  ")).unwrap().is_all());
        assert!(ClassFilter::parse(Some(",,")).unwrap().is_all());
    }

    #[test]
    fn test_filter_apply_uses_display_names() {
        let filter = ClassFilter::from_classes([GpcrClass::C, GpcrClass::T2]);
        let rows = vec![
            ("x", "Class A (Rhodopsin)"),
            ("y", "Class C (Glutamate)"),
            ("z", "Class T2 (Taste 2)"),
            ("w", "C"),
        ];

        let kept = filter.apply(rows, |row| row.1);
        assert_eq!(kept.iter().map(|r| r.0).collect::<Vec<_>>(), vec!["y", "z"]);
    }

    #[test]
    fn test_filter_all_keeps_everything() {
        let rows = vec![("a", ""), ("b", "anything")];
        assert_eq!(ClassFilter::all().apply(rows.clone(), |row| row.1), rows);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(ClassFilter::all().file_stem(), "all_classes");
        let filter = ClassFilter::parse(Some("b1,A")).unwrap();
        assert_eq!(filter.file_stem(), "B1_A");
        assert_eq!(filter.to_string(), "B1,A");
    }

    fn flip_case(text: &str, mask: &[bool]) -> String {
        text.chars()
            .zip(mask.iter().cycle())
            .map(|(ch, upper)| {
                if *upper {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_any_casing_of_code_or_name_normalizes(
            class in proptest::sample::select(GpcrClass::ALL.to_vec()),
            use_name in any::<bool>(),
            mask in proptest::collection::vec(any::<bool>(), 1..8),
        ) {
            let base = if use_name { class.display_name() } else { class.code() };
            let token = flip_case(base, &mask);
            prop_assert_eq!(normalize_class_tokens(&token).unwrap(), vec![class]);
        }

        #[test]
        fn prop_invalid_tokens_are_all_reported(
            valid in proptest::sample::select(GpcrClass::ALL.to_vec()),
            invalid in proptest::collection::vec("[x-z]{3,6}", 1..4),
        ) {
            let mut tokens = vec![valid.code().to_string()];
            tokens.extend(invalid.iter().cloned());
            let err = normalize_class_tokens(&tokens.join(",")).unwrap_err();
            let message = err.to_string();
            for token in &invalid {
                prop_assert!(message.contains(token.as_str()));
            }
        }
    }
}
