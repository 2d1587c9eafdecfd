//! Bibliographic records and their BibTeX representation.
//!
//! The [`Record`] type is the unit every other module works on: the reader
//! produces records, the classifier canonicalizes them, the deduplicator
//! filters them, and the writer serializes them.
//!
//! # Example
//!
//! ```
//! use bibcanon::record::{Record, io_bibtex};
//!
//! let records = io_bibtex::from_bibtex_str(
//!     "@inproceedings{x, author = {Doe, Jane}, year = 2014}",
//! )?;
//! assert_eq!(records[0].get("author"), Some("Doe, Jane"));
//! # Ok::<(), bibcanon::BibError>(())
//! ```

pub mod io_bibtex;
mod model;

pub use model::{Record, AUTHOR, BOOKTITLE, INPROCEEDINGS, TITLE, YEAR};
