//! Field-level canonicalization.
//!
//! Each submodule is a pure function from a raw field value to its canonical
//! form:
//!
//! - [`name`]: author lists to "Given Family" form
//! - [`year`]: free-form year text to a 4-digit year
//! - [`title`]: paper titles to title case
//! - [`key`]: citation keys from (family name, year, venue abbreviation)
//!
//! Venue names are canonicalized by [`crate::venue`].

pub mod key;
pub mod name;
pub mod title;
pub mod year;

pub use key::generate_key;
pub use name::{
    normalize_author, normalize_authors, AuthorList, CanonicalAuthor, NameFailure, NameProblem,
};
pub use title::title_case;
pub use year::normalize_year;

use thiserror::Error;

use crate::record::{AUTHOR, BOOKTITLE};

/// Why a single record could not be canonicalized.
///
/// These are expected outcomes, not fatal errors: the classifier attaches
/// them to the invalid record and moves on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CanonError {
    #[error("field `author`: {}", join_failures(.failures))]
    NameNotCanonicalizable { failures: Vec<NameFailure> },

    #[error("field `booktitle`: venue '{venue}' is not recognized")]
    VenueNotRecognized { venue: String },

    #[error("field `{field}`: {problem}")]
    MissingField { field: String, problem: String },

    #[error("entry type `@{entry_type}` is not supported (only @inproceedings)")]
    UnsupportedEntryType { entry_type: String },
}

impl CanonError {
    pub(crate) fn missing(field: &str, problem: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.to_string(),
            problem: problem.into(),
        }
    }

    /// A stable name for the kind of failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameNotCanonicalizable { .. } => "NameNotCanonicalizable",
            Self::VenueNotRecognized { .. } => "VenueNotRecognized",
            Self::MissingField { .. } => "MissingField",
            Self::UnsupportedEntryType { .. } => "UnsupportedEntryType",
        }
    }

    /// The record field the failure is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NameNotCanonicalizable { .. } => Some(AUTHOR),
            Self::VenueNotRecognized { .. } => Some(BOOKTITLE),
            Self::MissingField { field, .. } => Some(field.as_str()),
            Self::UnsupportedEntryType { .. } => None,
        }
    }
}

fn join_failures(failures: &[NameFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
