//! Author name canonicalization.
//!
//! Every author is rewritten to "Given Family" form. Two input layouts are
//! accepted:
//!
//! - `Family, Given`: a single top-level comma splits the name. More than one
//!   comma (`Doe, Jr., John`) is rejected.
//! - `Given Family`: the last word is the family name, everything before it
//!   is the given name.
//!
//! Text inside braces is one unit and is never split, so `{Microsoft
//! Research}` is a single word (and therefore rejected as a personal name).
//!
//! A given name is considered abbreviated when the letters of its first word
//! (braces and LaTeX accent commands removed, so `{\'E}.` reads as `E.`)
//! are a single character or have a period as their second character (`J.`,
//! `J.R.`, `J.-P.`). Abbreviated names are rejected because the full name
//! cannot be recovered. Middle initials after a full first name are fine.
//!
//! Generational suffixes (`Jr.`, `III`) have no slot in "Given Family" form,
//! so a name whose given name or family name is only a suffix is rejected.

use std::fmt;

use thiserror::Error;

use super::CanonError;

/// A person's name split into its given and family parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalAuthor {
    pub given: String,
    pub family: String,
}

impl fmt::Display for CanonicalAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.given, self.family)
    }
}

/// A non-empty, ordered list of canonical authors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorList(Vec<CanonicalAuthor>);

impl AuthorList {
    /// The first author, whose family name goes into the citation key.
    pub fn first(&self) -> &CanonicalAuthor {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AuthorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, author) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{author}")?;
        }
        Ok(())
    }
}

/// Why one author name was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NameProblem {
    #[error("given name is abbreviated; use the full name")]
    AbbreviatedGivenName,
    #[error("cannot split into given and family name")]
    SingleWord,
    #[error("more than one comma; expected 'Family, Given'")]
    TooManyCommas,
    #[error("empty given or family name")]
    EmptyPart,
    #[error("empty author name")]
    EmptyName,
    #[error("generational suffix (Jr., Sr., III) in place of a name part")]
    GenerationalSuffix,
}

/// One rejected author within an author list.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{name}' {problem}")]
pub struct NameFailure {
    pub name: String,
    pub problem: NameProblem,
}

/// Canonicalizes an `and`-separated author field.
///
/// Every author is checked; the field fails if any author fails, and the
/// error lists all failing authors.
///
/// # Example
/// ```
/// use bibcanon::canon::normalize_authors;
///
/// let authors = normalize_authors("Doe, Jane and John Smith").unwrap();
/// assert_eq!(authors.to_string(), "Jane Doe and John Smith");
/// assert_eq!(authors.first().family, "Doe");
/// ```
pub fn normalize_authors(raw: &str) -> Result<AuthorList, CanonError> {
    let mut authors = Vec::new();
    let mut failures = Vec::new();

    for name in split_authors(raw) {
        match normalize_author(&name) {
            Ok(author) => authors.push(author),
            Err(problem) => failures.push(NameFailure { name, problem }),
        }
    }

    if failures.is_empty() && !authors.is_empty() {
        Ok(AuthorList(authors))
    } else {
        if authors.is_empty() && failures.is_empty() {
            failures.push(NameFailure {
                name: raw.trim().to_string(),
                problem: NameProblem::EmptyName,
            });
        }
        Err(CanonError::NameNotCanonicalizable { failures })
    }
}

/// Canonicalizes a single author name.
pub fn normalize_author(raw: &str) -> Result<CanonicalAuthor, NameProblem> {
    let parts = split_top_level(raw, ',');
    let (given, family) = match parts.as_slice() {
        [single] => {
            let words = split_words(single);
            match words.split_last() {
                None => return Err(NameProblem::EmptyName),
                Some((_, [])) => return Err(NameProblem::SingleWord),
                Some((family, given)) => (given.join(" "), family.to_string()),
            }
        }
        [family, given] => {
            let family = split_words(family).join(" ");
            let given = split_words(given).join(" ");
            if family.is_empty() || given.is_empty() {
                return Err(NameProblem::EmptyPart);
            }
            (given, family)
        }
        _ => return Err(NameProblem::TooManyCommas),
    };

    if is_suffix(&family) || split_words(&given).first().is_some_and(|w| is_suffix(w)) {
        return Err(NameProblem::GenerationalSuffix);
    }
    if is_abbreviated(&given) {
        return Err(NameProblem::AbbreviatedGivenName);
    }

    Ok(CanonicalAuthor { given, family })
}

/// Splits an author field on the word `and` (any case) outside braces.
/// Each returned name has its whitespace collapsed. An empty field gives no
/// names; empty slots between `and`s give empty names.
fn split_authors(raw: &str) -> Vec<String> {
    let words = split_words(raw);
    if words.is_empty() {
        return Vec::new();
    }

    words
        .split(|word| word.eq_ignore_ascii_case("and"))
        .map(|name| name.join(" "))
        .collect()
}

/// Splits on whitespace outside braces.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                words.push(&text[s..idx]);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

/// Splits on `sep` outside braces.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_abbreviated(given: &str) -> bool {
    let Some(first_word) = split_words(given).into_iter().next() else {
        return true;
    };
    let letters = letters_and_periods(first_word);
    let mut chars = letters.chars();
    match (chars.next(), chars.next()) {
        (None, _) | (Some(_), None) => true,
        (Some(_), Some(second)) => second == '.',
    }
}

/// The letters and periods of a word, without braces or LaTeX commands:
/// `{\'E}.` gives `E.` and `\v{C}ech` gives `Cech`.
fn letters_and_periods(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // control word (`\v`, `\ss`) or control symbol (`\'`)
            if chars.peek().is_some_and(|n| n.is_alphabetic()) {
                while chars.next_if(|n| n.is_alphabetic()).is_some() {}
            } else {
                chars.next();
            }
        } else if c.is_alphabetic() || c == '.' {
            out.push(c);
        }
    }
    out
}

const SUFFIXES: &[&str] = &["Jr", "Jr.", "Sr", "Sr.", "II", "III", "IV"];

fn is_suffix(word: &str) -> bool {
    SUFFIXES.contains(&word.trim_end_matches(','))
}
