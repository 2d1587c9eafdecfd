//! Run report types.
//!
//! A [`FormatReport`] summarizes one pipeline run: how many records came in,
//! how many were canonicalized, which ones need a manual fix and why, and
//! which duplicates were dropped. It can be printed for humans or serialized
//! to JSON.

use std::fmt;

use serde::Serialize;

/// Summary of one pipeline run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FormatReport {
    /// Number of records read.
    pub input_count: usize,
    /// Number of records written to the valid output.
    pub valid_count: usize,
    /// Number of records written to the invalid output.
    pub invalid_count: usize,
    /// Number of valid records dropped as duplicates.
    pub duplicate_count: usize,
    /// Name of the venue matching strategy used.
    pub matcher: String,
    /// One entry per problem found in an invalid record.
    pub issues: Vec<RecordIssue>,
    /// One entry per dropped duplicate.
    pub duplicates: Vec<DuplicateNote>,
}

impl FormatReport {
    pub fn new(matcher: impl Into<String>) -> Self {
        Self {
            matcher: matcher.into(),
            ..Default::default()
        }
    }

    /// Returns true if every record was canonicalized.
    pub fn is_clean(&self) -> bool {
        self.invalid_count == 0
    }
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed {} record(s): {} valid, {} invalid, {} duplicate(s) dropped",
            self.input_count, self.valid_count, self.invalid_count, self.duplicate_count
        )?;

        if self.issues.is_empty() && self.duplicates.is_empty() {
            return Ok(());
        }
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        for duplicate in &self.duplicates {
            writeln!(f, "  {}", duplicate)?;
        }

        Ok(())
    }
}

/// One problem with one invalid record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    /// Position of the record in the input, starting at 1.
    pub position: usize,
    /// Citation key as authored.
    pub key: String,
    /// Stable failure code (e.g. `VenueNotRecognized`).
    pub code: String,
    /// Field the problem is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[INVALID] {} in entry {} ({}): {}",
            self.code, self.position, self.key, self.message
        )
    }
}

/// A duplicate dropped from the valid output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateNote {
    /// Position of the dropped record in the input, starting at 1.
    pub position: usize,
    /// Position of the record that was kept, starting at 1.
    pub kept_position: usize,
    /// The shared canonical key.
    pub key: String,
}

impl fmt::Display for DuplicateNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[DUP    ] entry {} duplicates entry {} ({})",
            self.position, self.kept_position, self.key
        )
    }
}
