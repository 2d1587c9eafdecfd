//! Venue reference data and venue recognition.
//!
//! A [`VenueTable`] is the ordered list of known conferences. It is loaded
//! once (from YAML or the built-in default) and then only read. Order is
//! significant: when several venues match a raw string, the first one in
//! the table wins.
//!
//! How a raw string is compared with a venue is decided by a
//! [`VenueMatcher`], so stricter or fuzzier strategies can be swapped in
//! without touching the classifier.
//!
//! # Example
//!
//! ```
//! use bibcanon::venue::{ContainmentMatcher, Venue, VenueTable};
//!
//! let table = VenueTable::new(vec![Venue::new(
//!     "International Conference on Software Engineering",
//!     "ICSE",
//!     ["icse"],
//! )])?;
//! let venue = table.resolve("Proc. of the 36th ICSE", &ContainmentMatcher).unwrap();
//! assert_eq!(venue.abbreviation, "ICSE");
//! # Ok::<(), bibcanon::BibError>(())
//! ```

mod config;
mod matcher;

pub use config::{default_venue_table, read_venue_table, venue_table_from_yaml_str};
pub use matcher::{normalize_venue_text, ContainmentMatcher, ExactMatcher, VenueMatcher};

use serde::{Deserialize, Serialize};

use crate::error::BibError;

/// A known conference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Canonical name written into `booktitle`.
    pub name: String,

    /// Short form used in citation keys (e.g. `ICSE`).
    pub abbreviation: String,

    /// Other spellings that identify this venue. The canonical name always
    /// matches implicitly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Venue {
    /// Creates a venue.
    pub fn new<I, S>(name: impl Into<String>, abbreviation: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// The canonical name followed by all aliases.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// The ordered, immutable list of known venues.
#[derive(Clone, Debug)]
pub struct VenueTable {
    venues: Vec<Venue>,
}

impl VenueTable {
    /// Builds a table, checking that it is usable.
    ///
    /// # Errors
    /// Returns [`BibError::VenueConfigInvalid`] if the list is empty, a venue
    /// has an empty name or an abbreviation without alphanumeric characters,
    /// or a canonical name is shadowed by an earlier venue under
    /// [`ContainmentMatcher`]. A shadowed name would not map back to itself,
    /// so canonical records would change on a second pass.
    pub fn new(venues: Vec<Venue>) -> Result<Self, BibError> {
        if venues.is_empty() {
            return Err(BibError::VenueConfigInvalid {
                message: "venue list is empty".to_string(),
            });
        }

        for (idx, venue) in venues.iter().enumerate() {
            if normalize_venue_text(&venue.name).is_empty() {
                return Err(BibError::VenueConfigInvalid {
                    message: format!("venue at index {idx} has an empty name"),
                });
            }
            if !venue.abbreviation.chars().any(char::is_alphanumeric) {
                return Err(BibError::VenueConfigInvalid {
                    message: format!(
                        "venue '{}' has no usable abbreviation ('{}')",
                        venue.name, venue.abbreviation
                    ),
                });
            }
        }

        let table = Self { venues };
        for (idx, venue) in table.venues.iter().enumerate() {
            let resolved = table
                .position(&venue.name, &ContainmentMatcher)
                .unwrap_or(idx);
            if resolved != idx {
                return Err(BibError::VenueConfigInvalid {
                    message: format!(
                        "venue '{}' is shadowed by earlier venue '{}'; move it up or narrow the earlier aliases",
                        venue.name, table.venues[resolved].name
                    ),
                });
            }
        }

        Ok(table)
    }

    /// All venues in configured order.
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Returns the first venue that `matcher` accepts for `raw`.
    pub fn resolve<M>(&self, raw: &str, matcher: &M) -> Option<&Venue>
    where
        M: VenueMatcher + ?Sized,
    {
        self.position(raw, matcher).map(|idx| &self.venues[idx])
    }

    fn position<M>(&self, raw: &str, matcher: &M) -> Option<usize>
    where
        M: VenueMatcher + ?Sized,
    {
        self.venues
            .iter()
            .position(|venue| matcher.matches(raw, venue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> VenueTable {
        VenueTable::new(vec![
            Venue::new(
                "International Conference on Software Engineering",
                "ICSE",
                ["icse"],
            ),
            Venue::new(
                "ACM Conference on Computer and Communications Security",
                "CCS",
                ["ccs", "computer and communications security"],
            ),
        ])
        .expect("valid fixture")
    }

    #[test]
    fn resolve_by_alias() {
        let table = fixture();
        let venue = table.resolve("ACM CCS '14", &ContainmentMatcher).unwrap();
        assert_eq!(venue.abbreviation, "CCS");
    }

    #[test]
    fn resolve_unknown() {
        let table = fixture();
        assert!(table
            .resolve("Intl. Conf. on Nonexistent Things 2099", &ContainmentMatcher)
            .is_none());
    }

    #[test]
    fn first_match_wins() {
        let table = VenueTable::new(vec![
            Venue::new("Alpha Conference", "ALPHA", ["shared"]),
            Venue::new("Beta Conference", "BETA", ["shared"]),
        ])
        .unwrap();
        let venue = table.resolve("the shared venue", &ContainmentMatcher).unwrap();
        assert_eq!(venue.abbreviation, "ALPHA");
    }

    #[test]
    fn rejects_empty_table() {
        let err = VenueTable::new(vec![]).unwrap_err();
        assert!(matches!(err, BibError::VenueConfigInvalid { .. }));
    }

    #[test]
    fn rejects_missing_abbreviation() {
        let err = VenueTable::new(vec![Venue::new("Alpha Conference", " . ", ["a"])]).unwrap_err();
        assert!(matches!(err, BibError::VenueConfigInvalid { .. }));
    }

    #[test]
    fn rejects_shadowed_canonical_name() {
        let err = VenueTable::new(vec![
            Venue::new("Security Workshop", "SW", ["security"]),
            Venue::new("USENIX Security Symposium", "SEC", Vec::<String>::new()),
        ])
        .unwrap_err();
        match err {
            BibError::VenueConfigInvalid { message } => {
                assert!(message.contains("shadowed"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
