//! Venue matching strategies.

use super::Venue;

/// Raw strings shorter than this (in alphanumeric characters) are never
/// looked up inside a venue spelling, so that fragments like `on` or `acm`
/// do not match everything.
const MIN_REVERSE_MATCH_LEN: usize = 4;

/// Decides whether a raw venue string refers to a known venue.
pub trait VenueMatcher {
    /// Returns true if `raw` identifies `venue`.
    fn matches(&self, raw: &str, venue: &Venue) -> bool;

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Case-insensitive whole-word containment in either direction.
///
/// Matches when the normalized raw string contains a normalized spelling of
/// the venue as a run of whole words, or when a spelling contains the raw
/// string (if the raw string has at least four alphanumeric characters).
#[derive(Clone, Copy, Debug, Default)]
pub struct ContainmentMatcher;

impl VenueMatcher for ContainmentMatcher {
    fn matches(&self, raw: &str, venue: &Venue) -> bool {
        let raw = normalize_venue_text(raw);
        if raw.is_empty() {
            return false;
        }
        let reverse_allowed =
            raw.chars().filter(|c| c.is_alphanumeric()).count() >= MIN_REVERSE_MATCH_LEN;

        venue.spellings().any(|spelling| {
            let spelling = normalize_venue_text(spelling);
            !spelling.is_empty()
                && (contains_words(&raw, &spelling)
                    || (reverse_allowed && contains_words(&spelling, &raw)))
        })
    }

    fn name(&self) -> &'static str {
        "containment"
    }
}

/// Matches only when the normalized raw string equals a normalized spelling.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatcher;

impl VenueMatcher for ExactMatcher {
    fn matches(&self, raw: &str, venue: &Venue) -> bool {
        let raw = normalize_venue_text(raw);
        !raw.is_empty()
            && venue
                .spellings()
                .any(|spelling| normalize_venue_text(spelling) == raw)
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Normalizes venue text for comparison.
///
/// Lowercases, turns every non-alphanumeric character (BibTeX braces, quotes,
/// punctuation) into a space, and collapses whitespace.
pub fn normalize_venue_text(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if `needle` occurs in `haystack` as a run of whole words.
/// Both arguments must already be normalized.
fn contains_words(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icse() -> Venue {
        Venue::new(
            "International Conference on Software Engineering",
            "ICSE",
            ["icse"],
        )
    }

    #[test]
    fn normalize_strips_bibtex_noise() {
        assert_eq!(
            normalize_venue_text("  Proc. of the {36th} \"ICSE\",  2014 "),
            "proc of the 36th icse 2014"
        );
        assert_eq!(normalize_venue_text("{}"), "");
    }

    #[test]
    fn containment_raw_contains_alias() {
        assert!(ContainmentMatcher.matches("Proceedings of ICSE 2014", &icse()));
        assert!(ContainmentMatcher.matches(
            "Proceedings of the 36th International Conference on Software Engineering",
            &icse()
        ));
    }

    #[test]
    fn containment_alias_contains_raw() {
        assert!(ContainmentMatcher.matches("Software Engineering", &icse()));
    }

    #[test]
    fn containment_respects_word_boundaries() {
        assert!(!ContainmentMatcher.matches("ICSEW workshop", &icse()));
        assert!(!ContainmentMatcher.matches("Engineer", &icse()));
    }

    #[test]
    fn containment_ignores_short_fragments() {
        assert!(!ContainmentMatcher.matches("on", &icse()));
        assert!(!ContainmentMatcher.matches("", &icse()));
    }

    #[test]
    fn exact_requires_full_spelling() {
        assert!(ExactMatcher.matches("ICSE", &icse()));
        assert!(ExactMatcher.matches(
            "international conference on software engineering",
            &icse()
        ));
        assert!(!ExactMatcher.matches("Proceedings of ICSE 2014", &icse()));
    }
}
