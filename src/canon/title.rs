//! Paper title casing.
//!
//! Titles are put in title case: every word starts with a capital except
//! short function words (articles, conjunctions, short prepositions), which
//! are lowercased unless they start the title or follow a colon. Words that
//! already carry capitals after their first letter (acronyms, `LaTeX`) or
//! contain braces or LaTeX commands are left exactly as written. Applying the
//! function twice gives the same result as applying it once.

/// Words kept lowercase inside a title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "is", "nor", "of", "on", "or",
    "the", "to", "vs", "with",
];

/// Converts a title to title case, collapsing whitespace.
///
/// # Example
/// ```
/// use bibcanon::canon::title_case;
///
/// assert_eq!(
///     title_case("the {BibTeX} book: a guide to   references"),
///     "The {BibTeX} Book: A Guide to References"
/// );
/// ```
pub fn title_case(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut capitalize_next = true;

    for word in raw.split_whitespace() {
        let formatted = if is_protected(word) {
            word.to_string()
        } else if !capitalize_next && is_small_word(word) {
            word.to_lowercase()
        } else {
            capitalize_first(word)
        };
        capitalize_next = word.ends_with(':');
        out.push(formatted);
    }

    out.join(" ")
}

fn is_protected(word: &str) -> bool {
    word.contains(['{', '}', '\\']) || word.chars().skip(1).any(char::is_uppercase)
}

fn is_small_word(word: &str) -> bool {
    let bare = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    SMALL_WORDS.contains(&bare.as_str())
}

fn capitalize_first(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_words() {
        assert_eq!(
            title_case("measuring the impact of spam"),
            "Measuring the Impact of Spam"
        );
    }

    #[test]
    fn first_word_and_after_colon() {
        assert_eq!(title_case("a study: on things"), "A Study: On Things");
    }

    #[test]
    fn small_words_are_lowercased() {
        assert_eq!(title_case("Trends In Spam And Abuse"), "Trends in Spam and Abuse");
    }

    #[test]
    fn protected_words_untouched() {
        assert_eq!(
            title_case("scaling {tor} with iOS and DNSSEC"),
            "Scaling {tor} with iOS and DNSSEC"
        );
        assert_eq!(title_case("\\emph{fast} proofs"), "\\emph{fast} Proofs");
    }

    #[test]
    fn leading_punctuation() {
        assert_eq!(title_case("(almost) free lunch"), "(Almost) Free Lunch");
        assert_eq!(title_case("spam, or not?"), "Spam, or Not?");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "the {BibTeX} book: a guide to references",
            "Trends In Spam And Abuse",
            "x86 on ARM: IS it fast",
        ] {
            let once = title_case(raw);
            assert_eq!(title_case(&once), once, "input {raw:?}");
        }
    }
}
