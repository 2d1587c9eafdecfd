//! Canonical citation keys.
//!
//! A key is `{surname}{year}{abbreviation}`, all lowercase, e.g.
//! `doe2014icse`. The surname is the last word of the first author's family
//! name with everything but letters removed, so `van der Berg` and
//! `{M\"u}ller` become `berg` and `muller`. Two records with the same
//! (family name, year, abbreviation) always get the same key, which is what
//! deduplication relies on.

use super::CanonError;
use crate::record::{AUTHOR, BOOKTITLE, YEAR};

/// Builds the canonical key.
///
/// # Errors
/// Returns [`CanonError::MissingField`] if `year` is not exactly four ASCII
/// digits, or if the family name or abbreviation leave nothing to build a
/// key from.
///
/// # Example
/// ```
/// use bibcanon::canon::generate_key;
///
/// assert_eq!(generate_key("Doe", "2014", "ICSE").unwrap(), "doe2014icse");
/// ```
pub fn generate_key(family: &str, year: &str, abbreviation: &str) -> Result<String, CanonError> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CanonError::missing(
            YEAR,
            format!("'{year}' is not a 4-digit year"),
        ));
    }

    let surname: String = family
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if surname.is_empty() {
        return Err(CanonError::missing(
            AUTHOR,
            format!("family name '{family}' has no letters to build a key from"),
        ));
    }

    let abbreviation: String = abbreviation
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if abbreviation.is_empty() {
        return Err(CanonError::missing(BOOKTITLE, "venue abbreviation is empty"));
    }

    Ok(format!("{surname}{year}{abbreviation}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_key() {
        assert_eq!(generate_key("Doe", "2014", "ICSE").unwrap(), "doe2014icse");
        assert_eq!(generate_key("Doe", "2014", "MSR").unwrap(), "doe2014msr");
    }

    #[test]
    fn key_is_deterministic() {
        let a = generate_key("Smith", "2015", "CCS").unwrap();
        let b = generate_key("Smith", "2015", "CCS").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn family_name_particles_and_latex() {
        assert_eq!(generate_key("van der Berg", "2010", "SP").unwrap(), "berg2010sp");
        assert_eq!(generate_key("{M\\\"u}ller", "2010", "SP").unwrap(), "muller2010sp");
        assert_eq!(generate_key("O'Neil", "2010", "S&P").unwrap(), "oneil2010sp");
    }

    #[test]
    fn bad_year_is_missing_field() {
        for year in ["", "14", "20145", "2O14"] {
            let err = generate_key("Doe", year, "ICSE").unwrap_err();
            assert_eq!(err.field(), Some("year"), "year {year:?}");
        }
    }

    #[test]
    fn empty_parts_are_rejected() {
        assert_eq!(
            generate_key("1234", "2014", "ICSE").unwrap_err().field(),
            Some("author")
        );
        assert_eq!(
            generate_key("Doe", "2014", "--").unwrap_err().field(),
            Some("booktitle")
        );
    }
}
