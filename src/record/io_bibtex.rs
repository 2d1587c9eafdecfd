//! BibTeX reader and writer.
//!
//! This module turns BibTeX text into [`Record`]s and back. The reader is a
//! `nom` parser covering the parts of BibTeX that bibliographies use:
//!
//! - Entries may use `@type{...}` or `@type(...)`.
//! - Values may be braced (nesting allowed), quoted, or bare words/numbers,
//!   and may be concatenated with `#`.
//! - Bare words are kept literally. `@string` macros are not expanded and
//!   `crossref` fields are not resolved.
//! - `@comment`, `@preamble` and `@string` blocks are skipped, as is any text
//!   between entries, `%` comment lines, and any `@` that does not open an
//!   entry (`jane@example.org`).
//! - Braces must balance inside every value, quoted values included.
//!
//! # Deterministic Output
//!
//! The writer emits fields in name order (the order of the record's
//! `BTreeMap`), one per line, every value in braces.

use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::{anychar, char, multispace0, multispace1, one_of, satisfy},
    combinator::{map, opt, recognize},
    error::{ErrorKind, ParseError},
    multi::{many0_count, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use super::model::Record;
use crate::error::BibError;

// ============================================================================
// Public API
// ============================================================================

/// Reads all records from a BibTeX file.
///
/// # Errors
/// Returns an error if the file cannot be read or contains a malformed entry.
pub fn read_bibtex(path: &Path) -> Result<Vec<Record>, BibError> {
    let content = fs::read_to_string(path).map_err(BibError::Io)?;
    parse_bibtex(&content, path)
}

/// Parses records from a BibTeX string.
///
/// Useful for testing without file I/O.
pub fn from_bibtex_str(input: &str) -> Result<Vec<Record>, BibError> {
    parse_bibtex(input, Path::new("<string>"))
}

/// Writes records to a BibTeX file.
pub fn write_bibtex(path: &Path, records: &[Record]) -> Result<(), BibError> {
    fs::write(path, to_bibtex_string(records)).map_err(BibError::Io)
}

/// Renders records as BibTeX text.
pub fn to_bibtex_string(records: &[Record]) -> String {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        write_entry(&mut out, record, &[]);
    }
    out
}

/// Writes records to a BibTeX file, each preceded by `%` note lines.
pub fn write_bibtex_with_notes(
    path: &Path,
    entries: &[(&Record, Vec<String>)],
) -> Result<(), BibError> {
    fs::write(path, to_bibtex_string_with_notes(entries)).map_err(BibError::Io)
}

/// Renders records as BibTeX text, each preceded by `% <note>` lines.
///
/// Notes never contain `@`, so reading the output back yields the same
/// records.
pub fn to_bibtex_string_with_notes(entries: &[(&Record, Vec<String>)]) -> String {
    let mut out = String::new();
    for (idx, (record, notes)) in entries.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        write_entry(&mut out, record, notes);
    }
    out
}

/// Fuzz-only entrypoint for BibTeX parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_bibtex(input: &str) -> Result<(), BibError> {
    let _ = parse_bibtex(input, Path::new("<fuzz>"))?;
    Ok(())
}

// ============================================================================
// Writer
// ============================================================================

fn write_entry(out: &mut String, record: &Record, notes: &[String]) {
    for note in notes {
        for line in note.lines() {
            out.push_str("% ");
            out.push_str(&line.replace('@', "(at)"));
            out.push('\n');
        }
    }

    out.push('@');
    out.push_str(&record.entry_type);
    out.push('{');
    out.push_str(&record.key);
    out.push_str(",\n");
    for (name, value) in &record.fields {
        out.push_str("  ");
        out.push_str(name);
        out.push_str(" = {");
        out.push_str(value);
        out.push_str("},\n");
    }
    out.push_str("}\n");
}

// ============================================================================
// Reader
// ============================================================================

fn parse_bibtex(input: &str, path: &Path) -> Result<Vec<Record>, BibError> {
    let records = match bibliography(input) {
        Ok((_, records)) => records,
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            return Err(BibError::BibtexParse {
                path: path.to_path_buf(),
                line: line_of(input, err.at),
                message: err.message,
            })
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(BibError::BibtexParse {
                path: path.to_path_buf(),
                line: line_of(input, ""),
                message: "unexpected end of input".to_string(),
            })
        }
    };

    tracing::debug!(count = records.len(), path = %path.display(), "parsed BibTeX records");
    Ok(records)
}

/// A parse failure, positioned by the unparsed input it occurred at.
#[derive(Debug)]
struct SyntaxError<'a> {
    at: &'a str,
    message: String,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            at: input,
            message: format!("unexpected input ({kind:?}), found {}", describe_next(input)),
        }
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

fn fail<'a, T>(at: &'a str, message: impl Into<String>) -> PResult<'a, T> {
    Err(nom::Err::Failure(SyntaxError {
        at,
        message: message.into(),
    }))
}

/// Runs `parser`, turning a recoverable error into a failure that carries
/// `message`.
fn required<'a, T, F, M>(mut parser: F, message: M) -> impl FnMut(&'a str) -> PResult<'a, T>
where
    F: FnMut(&'a str) -> PResult<'a, T>,
    M: Fn(&'a str) -> String,
{
    move |input| match parser(input) {
        Err(nom::Err::Error(_)) => fail(input, message(input)),
        other => other,
    }
}

/// Every entry in the input, in order.
fn bibliography(input: &str) -> PResult<'_, Vec<Record>> {
    let mut records = Vec::new();
    let mut rest = input;

    loop {
        let (r, _) = between_entries(rest)?;
        if r.is_empty() {
            return Ok((r, records));
        }

        match entry_head(r) {
            Ok((body, head)) => {
                let (r, record) = entry(body, &head)?;
                records.extend(record);
                rest = r;
            }
            // an `@` that does not open an entry is ordinary text
            Err(nom::Err::Error(_)) => {
                let (r, _) = free_text(r)?;
                rest = r;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Whitespace and `%` comment lines.
fn between_entries(input: &str) -> PResult<'_, usize> {
    many0_count(alt((
        multispace1,
        preceded(char('%'), take_till(|c: char| c == '\n')),
    )))(input)
}

/// At least one character of text outside any entry, up to the next `@` or
/// line break.
fn free_text(input: &str) -> PResult<'_, &str> {
    recognize(pair(anychar, take_till(|c: char| c == '@' || c == '\n')))(input)
}

struct EntryHead<'a> {
    /// Input starting at the entry's `@`.
    start: &'a str,
    entry_type: &'a str,
    close: char,
}

/// `@type{` or `@type(`.
fn entry_head(input: &str) -> PResult<'_, EntryHead<'_>> {
    let (rest, (entry_type, open)) = preceded(
        char('@'),
        pair(delimited(multispace0, identifier, multispace0), one_of("{(")),
    )(input)?;

    Ok((
        rest,
        EntryHead {
            start: input,
            entry_type,
            close: if open == '{' { '}' } else { ')' },
        },
    ))
}

fn identifier(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+'))(input)
}

fn citation_key(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, ',' | '{' | '}' | '(' | ')' | '"' | '#' | '=')
    })(input)
}

/// The rest of an entry after its opening delimiter. Blocks that do not
/// produce records (`@comment`, `@preamble`, `@string`) give `None`.
fn entry<'a>(input: &'a str, head: &EntryHead<'a>) -> PResult<'a, Option<Record>> {
    let lowered = head.entry_type.to_ascii_lowercase();
    if matches!(lowered.as_str(), "comment" | "preamble" | "string") {
        let open = if head.close == '}' { '{' } else { '(' };
        return match closing_offset(input, open, head.close) {
            Some(end) => {
                tracing::debug!(block = %lowered, "skipped non-entry block");
                Ok((&input[end + 1..], None))
            }
            None => fail(head.start, "unterminated block"),
        };
    }

    let entry_type = head.entry_type;
    let (rest, key) = preceded(
        multispace0,
        required(citation_key, |_| {
            format!("missing citation key in '@{entry_type}'")
        }),
    )(input)?;
    let mut record = Record::new(entry_type, key);

    let (rest, _) = multispace0(rest)?;
    let (rest, closed) = opt(char(head.close))(rest)?;
    if closed.is_some() {
        return Ok((rest, Some(record)));
    }
    let (mut rest, _) = required(char(','), |at| {
        format!("expected ',' after key '{key}', found {}", describe_next(at))
    })(rest)?;

    loop {
        let (r, _) = multispace0(rest)?;
        if r.is_empty() {
            return fail(head.start, format!("unterminated entry '{key}'"));
        }
        let (r, closed) = opt(char(head.close))(r)?;
        if closed.is_some() {
            return Ok((r, Some(record)));
        }

        let (r, (name, value)) = field(r, key)?;
        if record.get(name).is_some() {
            tracing::warn!(key, field = name, "duplicate field, keeping last value");
        }
        record.set(name, value);

        let (r, _) = multispace0(r)?;
        if r.is_empty() {
            return fail(head.start, format!("unterminated entry '{key}'"));
        }
        let (r, separator) = required(alt((char(','), char(head.close))), |at| {
            format!(
                "expected ',' or '{}' after field '{name}', found {}",
                head.close,
                describe_next(at)
            )
        })(r)?;
        if separator == head.close {
            return Ok((r, Some(record)));
        }
        rest = r;
    }
}

/// `name = value`.
fn field<'a>(input: &'a str, key: &str) -> PResult<'a, (&'a str, String)> {
    let (rest, name) = required(identifier, |at| {
        format!("expected field name in entry '{key}', found {}", describe_next(at))
    })(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = required(char('='), |_| format!("expected '=' after field '{name}'"))(rest)?;
    let (rest, value) = preceded(multispace0, field_value)(rest)?;
    Ok((rest, (name, value)))
}

/// One or more value pieces joined with `#`.
fn field_value(input: &str) -> PResult<'_, String> {
    map(
        separated_list1(delimited(multispace0, char('#'), multispace0), value_piece),
        |pieces| pieces.concat(),
    )(input)
}

fn value_piece(input: &str) -> PResult<'_, &str> {
    alt((braced_value, quoted_value, bare_value, missing_value))(input)
}

fn missing_value(input: &str) -> PResult<'_, &str> {
    fail(input, format!("expected field value, found {}", describe_next(input)))
}

/// A braced value; nested braces are kept.
fn braced_value(input: &str) -> PResult<'_, &str> {
    let (body, _) = char('{')(input)?;
    match closing_offset(body, '{', '}') {
        Some(end) => Ok((&body[end + 1..], &body[..end])),
        None => fail(input, "unterminated braced value"),
    }
}

/// A quoted value. A quote inside braces does not end it, and its braces
/// must balance so the value can be written back in braces.
fn quoted_value(input: &str) -> PResult<'_, &str> {
    let (body, _) = char('"')(input)?;
    let mut depth = 0usize;
    for (idx, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return fail(&body[idx..], "unbalanced '}' in quoted value"),
            '}' => depth -= 1,
            '"' if depth == 0 => return Ok((&body[idx + 1..], &body[..idx])),
            _ => {}
        }
    }
    fail(input, "unterminated quoted value")
}

/// A bare number or macro name, kept literally.
fn bare_value(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphanumeric()),
        take_while(|c: char| {
            !c.is_whitespace() && !matches!(c, ',' | '#' | '{' | '}' | '(' | ')' | '"' | '=')
        }),
    ))(input)
}

/// Byte offset of the delimiter that closes an already opened group.
fn closing_offset(input: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, c) in input.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// 1-based line of `rest` within `src`; `rest` must be a suffix of `src`.
fn line_of(src: &str, rest: &str) -> usize {
    let offset = src.len().saturating_sub(rest.len());
    src[..offset].matches('\n').count() + 1
}

fn describe_next(input: &str) -> String {
    match input.chars().next() {
        Some(c) => format!("'{c}'"),
        None => "end of input".to_string(),
    }
}
