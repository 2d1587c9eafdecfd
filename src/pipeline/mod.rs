//! The record pipeline: classify every record, then deduplicate the valid
//! ones.
//!
//! Order matters. Deduplication needs canonical keys, which only exist after
//! classification, and it must never see invalid records. Invalid records
//! are kept as authored, in input order, and are never deduplicated.

mod report;

pub use report::{DuplicateNote, FormatReport, RecordIssue};

use crate::classify::{Classification, Classifier, InvalidRecord};
use crate::dedup::{dedup_by_key, DroppedDuplicate};
use crate::record::Record;
use crate::venue::VenueMatcher;

/// The two output partitions of a run, plus what was dropped.
#[derive(Clone, Debug, Default)]
pub struct PipelineOutput {
    /// Canonical records, deduplicated, in input order.
    pub valid: Vec<Record>,
    /// Records needing a manual fix, as authored, in input order.
    pub invalid: Vec<InvalidRecord>,
    /// Dropped duplicates; indices refer to positions in the input.
    pub duplicates: Vec<DroppedDuplicate>,
    /// Summary of the run.
    pub report: FormatReport,
}

/// Runs every record through the classifier and deduplicates the valid ones.
///
/// # Example
/// ```
/// use bibcanon::classify::Classifier;
/// use bibcanon::pipeline::run_pipeline;
/// use bibcanon::record::io_bibtex::from_bibtex_str;
/// use bibcanon::venue::default_venue_table;
///
/// let records = from_bibtex_str(
///     "@inproceedings{a, author = {Doe, Jane}, title = {Things},
///        booktitle = {ICSE}, year = 2014}",
/// )?;
/// let venues = default_venue_table()?;
/// let output = run_pipeline(&records, &Classifier::new(&venues));
/// assert_eq!(output.valid[0].key, "doe2014icse");
/// assert!(output.invalid.is_empty());
/// # Ok::<(), bibcanon::BibError>(())
/// ```
pub fn run_pipeline<M: VenueMatcher>(
    records: &[Record],
    classifier: &Classifier<'_, M>,
) -> PipelineOutput {
    let mut report = FormatReport::new(classifier.matcher().name());
    report.input_count = records.len();

    let mut valid = Vec::new();
    let mut valid_positions = Vec::new();
    let mut invalid = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match classifier.classify(record) {
            Classification::Valid(canonical) => {
                valid.push(canonical);
                valid_positions.push(index);
            }
            Classification::Invalid(rejected) => {
                report
                    .issues
                    .extend(rejected.issues.iter().map(|issue| RecordIssue {
                        position: index + 1,
                        key: rejected.record.key.clone(),
                        code: issue.code().to_string(),
                        field: issue.field().map(str::to_string),
                        message: issue.to_string(),
                    }));
                invalid.push(rejected);
            }
        }
    }

    let outcome = dedup_by_key(valid);
    let duplicates: Vec<DroppedDuplicate> = outcome
        .dropped
        .into_iter()
        .map(|dropped| DroppedDuplicate {
            index: valid_positions[dropped.index],
            kept_index: valid_positions[dropped.kept_index],
            key: dropped.key,
        })
        .collect();

    report.duplicates = duplicates
        .iter()
        .map(|dropped| DuplicateNote {
            position: dropped.index + 1,
            kept_position: dropped.kept_index + 1,
            key: dropped.key.clone(),
        })
        .collect();
    report.valid_count = outcome.kept.len();
    report.invalid_count = invalid.len();
    report.duplicate_count = duplicates.len();

    tracing::info!(
        input = report.input_count,
        valid = report.valid_count,
        invalid = report.invalid_count,
        duplicates = report.duplicate_count,
        "pipeline finished"
    );

    PipelineOutput {
        valid: outcome.kept,
        invalid,
        duplicates,
        report,
    }
}
