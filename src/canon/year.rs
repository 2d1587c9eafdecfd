//! Year normalization.

use super::CanonError;
use crate::record::YEAR;

/// Extracts the publication year from a raw `year` field.
///
/// The first run of ASCII digits is taken and must be exactly four digits
/// long, so `{2014}` and `2014a` give `2014` while `14` and `20145` fail.
pub fn normalize_year(raw: &str) -> Result<String, CanonError> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.len() == 4 {
        Ok(digits)
    } else if raw.trim().is_empty() {
        Err(CanonError::missing(YEAR, "year is empty"))
    } else {
        Err(CanonError::missing(
            YEAR,
            format!("'{}' is not a 4-digit year", raw.trim()),
        ))
    }
}
