//! Core record model for bibcanon.
//!
//! A [`Record`] is one BibTeX entry: its entry type, its citation key, and
//! its fields. Field values are kept exactly as authored (after the reader
//! has removed the outer delimiters), so an invalid record can be written
//! back out unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the `and`-separated author list.
pub const AUTHOR: &str = "author";
/// Field holding the proceedings (venue) title.
pub const BOOKTITLE: &str = "booktitle";
/// Field holding the paper title.
pub const TITLE: &str = "title";
/// Field holding the publication year.
pub const YEAR: &str = "year";

/// The only entry type bibcanon canonicalizes.
pub const INPROCEEDINGS: &str = "inproceedings";

/// A single bibliographic record.
///
/// Field names are stored lowercase; lookups through [`Record::get`] are
/// case-insensitive. Fields are kept in a `BTreeMap` so that writing a
/// record is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Entry type as written after `@` (e.g. `inproceedings`).
    pub entry_type: String,

    /// Citation key as written, or the canonical key after classification.
    pub key: String,

    /// All fields of the entry, keyed by lowercase name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Creates a record with no fields.
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Returns true if this record is a proceedings paper.
    pub fn is_inproceedings(&self) -> bool {
        self.entry_type.eq_ignore_ascii_case(INPROCEEDINGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_case_insensitive() {
        let record = Record::new("inproceedings", "x").with_field("Author", "Jane Doe");
        assert_eq!(record.get("author"), Some("Jane Doe"));
        assert_eq!(record.get("AUTHOR"), Some("Jane Doe"));
        assert!(record.fields.contains_key("author"));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut record = Record::new("inproceedings", "x").with_field(YEAR, "2013");
        record.set(YEAR, "2014");
        assert_eq!(record.get(YEAR), Some("2014"));
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn entry_type_check_ignores_case() {
        assert!(Record::new("InProceedings", "x").is_inproceedings());
        assert!(!Record::new("article", "x").is_inproceedings());
    }
}
