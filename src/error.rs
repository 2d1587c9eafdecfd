use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::FormatReport;

/// The main error type for bibcanon operations.
///
/// Per-record canonicalization failures are not errors at this level; they
/// are carried by [`crate::classify::Classification::Invalid`]. Everything
/// here aborts the run.
#[derive(Debug, Error)]
pub enum BibError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse BibTeX from {path} at line {line}: {message}")]
    BibtexParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse venue configuration from {path}: {source}")]
    VenueConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid venue configuration: {message}")]
    VenueConfigInvalid { message: String },

    #[error("Failed to serialize report: {0}")]
    ReportWrite(#[from] serde_json::Error),

    #[error("{invalid_count} record(s) could not be canonicalized")]
    FormatFailed {
        invalid_count: usize,
        report: Box<FormatReport>,
    },
}
