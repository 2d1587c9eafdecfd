//! Duplicate removal over canonical records.
//!
//! Two valid records are duplicates when their canonical keys are equal.
//! The first occurrence wins; later ones are dropped from the output. They
//! are not errors and never show up as invalid records; they are only
//! returned so the caller can count or log them.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::Record;

/// A record dropped because an earlier record had the same key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DroppedDuplicate {
    /// The shared canonical key.
    pub key: String,
    /// Position of the dropped record in the deduplicated input.
    pub index: usize,
    /// Position of the record that was kept.
    pub kept_index: usize,
}

/// The result of deduplication.
#[derive(Clone, Debug, Default)]
pub struct DedupOutcome {
    /// Records in input order, one per key.
    pub kept: Vec<Record>,
    /// Everything that was dropped, in input order.
    pub dropped: Vec<DroppedDuplicate>,
}

/// Removes records whose key was already seen, preserving input order.
///
/// # Example
/// ```
/// use bibcanon::dedup::dedup_by_key;
/// use bibcanon::record::Record;
///
/// let records = vec![
///     Record::new("inproceedings", "doe2014icse").with_field("note", "first"),
///     Record::new("inproceedings", "roe2015ccs"),
///     Record::new("inproceedings", "doe2014icse").with_field("note", "second"),
/// ];
/// let outcome = dedup_by_key(records);
/// assert_eq!(outcome.kept.len(), 2);
/// assert_eq!(outcome.kept[0].get("note"), Some("first"));
/// assert_eq!(outcome.dropped[0].kept_index, 0);
/// ```
pub fn dedup_by_key(records: Vec<Record>) -> DedupOutcome {
    let mut first_seen: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut outcome = DedupOutcome::default();

    for (index, record) in records.into_iter().enumerate() {
        if let Some(&kept_index) = first_seen.get(&record.key) {
            tracing::info!(
                key = %record.key,
                index,
                kept_index,
                "dropping duplicate record"
            );
            outcome.dropped.push(DroppedDuplicate {
                key: record.key,
                index,
                kept_index,
            });
        } else {
            first_seen.insert(record.key.clone(), index);
            outcome.kept.push(record);
        }
    }

    outcome
}
