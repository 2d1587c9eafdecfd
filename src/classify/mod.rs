//! Per-record classification.
//!
//! The [`Classifier`] runs every field canonicalizer over one record and
//! returns either a canonical copy of the record or the untouched original
//! tagged with every problem found. It never fails: a record that cannot be
//! canonicalized is an expected outcome, reported through
//! [`Classification::Invalid`].

use crate::canon::{
    generate_key, normalize_authors, normalize_year, title_case, AuthorList, CanonError,
};
use crate::record::{Record, AUTHOR, BOOKTITLE, INPROCEEDINGS, TITLE, YEAR};
use crate::venue::{ContainmentMatcher, Venue, VenueMatcher, VenueTable};

/// The outcome of classifying one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// A canonical copy of the record, with its canonical key.
    Valid(Record),
    /// The record exactly as authored, with the reasons it was rejected.
    Invalid(InvalidRecord),
}

impl Classification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid(_))
    }
}

/// A record that needs a manual fix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidRecord {
    /// The record as it was read.
    pub record: Record,
    /// Every problem found, in field order (type, author, venue, year, title).
    pub issues: Vec<CanonError>,
}

impl InvalidRecord {
    /// All issues as one human-readable line.
    pub fn reason(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Canonicalizes records against a venue table.
///
/// The venue matching strategy is a type parameter so it can be swapped
/// without touching classification.
#[derive(Clone, Debug)]
pub struct Classifier<'a, M = ContainmentMatcher> {
    venues: &'a VenueTable,
    matcher: M,
}

impl<'a> Classifier<'a, ContainmentMatcher> {
    /// A classifier using [`ContainmentMatcher`].
    pub fn new(venues: &'a VenueTable) -> Self {
        Self::with_matcher(venues, ContainmentMatcher)
    }
}

impl<'a, M: VenueMatcher> Classifier<'a, M> {
    /// A classifier using the given matching strategy.
    pub fn with_matcher(venues: &'a VenueTable, matcher: M) -> Self {
        Self { venues, matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Classifies one record. The input is never modified.
    pub fn classify(&self, record: &Record) -> Classification {
        let mut issues = Vec::new();

        if !record.is_inproceedings() {
            issues.push(CanonError::UnsupportedEntryType {
                entry_type: record.entry_type.clone(),
            });
        }

        let authors: Option<AuthorList> = match record.get(AUTHOR) {
            Some(raw) => normalize_authors(raw).map_err(|e| issues.push(e)).ok(),
            None => {
                issues.push(CanonError::missing(AUTHOR, "field is missing"));
                None
            }
        };

        let venue: Option<&Venue> = match record.get(BOOKTITLE) {
            Some(raw) => {
                let found = self.venues.resolve(raw, &self.matcher);
                if found.is_none() {
                    issues.push(CanonError::VenueNotRecognized {
                        venue: raw.trim().to_string(),
                    });
                }
                found
            }
            None => {
                issues.push(CanonError::missing(BOOKTITLE, "field is missing"));
                None
            }
        };

        let year: Option<String> = match record.get(YEAR) {
            Some(raw) => normalize_year(raw).map_err(|e| issues.push(e)).ok(),
            None => {
                issues.push(CanonError::missing(YEAR, "field is missing"));
                None
            }
        };

        let title: Option<String> = match record.get(TITLE) {
            Some(raw) if !raw.trim().is_empty() => Some(title_case(raw)),
            Some(_) => {
                issues.push(CanonError::missing(TITLE, "field is empty"));
                None
            }
            None => {
                issues.push(CanonError::missing(TITLE, "field is missing"));
                None
            }
        };

        let (Some(authors), Some(venue), Some(year), Some(title), true) =
            (authors, venue, year, title, issues.is_empty())
        else {
            return self.reject(record, issues);
        };

        let key = match generate_key(&authors.first().family, &year, &venue.abbreviation) {
            Ok(key) => key,
            Err(e) => return self.reject(record, vec![e]),
        };

        let mut canonical = record.clone();
        canonical.entry_type = INPROCEEDINGS.to_string();
        canonical.key = key;
        replace_field(&mut canonical, AUTHOR, authors.to_string());
        replace_field(&mut canonical, BOOKTITLE, venue.name.clone());
        replace_field(&mut canonical, YEAR, year);
        replace_field(&mut canonical, TITLE, title);

        if canonical.key != record.key {
            tracing::debug!(from = %record.key, to = %canonical.key, "rewrote citation key");
        }
        Classification::Valid(canonical)
    }

    fn reject(&self, record: &Record, issues: Vec<CanonError>) -> Classification {
        let invalid = InvalidRecord {
            record: record.clone(),
            issues,
        };
        tracing::warn!(
            key = %record.key,
            matcher = self.matcher.name(),
            reason = %invalid.reason(),
            "record needs a manual fix"
        );
        Classification::Invalid(invalid)
    }
}

fn replace_field(record: &mut Record, field: &str, value: String) {
    if record.get(field) != Some(value.as_str()) {
        tracing::debug!(key = %record.key, field, to = %value, "canonicalized field");
        record.set(field, value);
    }
}
