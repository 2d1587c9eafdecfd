#![allow(dead_code)]

use bibcanon::record::{Record, AUTHOR, BOOKTITLE, TITLE, YEAR};
use bibcanon::venue::{Venue, VenueTable};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Small venue table shared by the property tests.
pub fn fixture_venues() -> VenueTable {
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
        Venue::new("USENIX Security Symposium", "SEC", ["usenix security"]),
    ])
    .expect("fixture venue table")
}

/// A paper as the generator intends it, before spelling variation.
#[derive(Clone, Debug)]
pub struct PaperPlan {
    pub authors: Vec<(String, String)>,
    pub venue: usize,
    pub year: u32,
    pub title: String,
}

impl PaperPlan {
    /// The key the pipeline should produce for this paper.
    pub fn expected_key(&self, table: &VenueTable) -> String {
        format!(
            "{}{}{}",
            self.authors[0].1.to_lowercase(),
            self.year,
            table.venues()[self.venue].abbreviation.to_lowercase()
        )
    }
}

fn name_part(pattern: &'static str) -> BoxedStrategy<String> {
    pattern
        .prop_filter("'and' separates authors", |s| !s.eq_ignore_ascii_case("and"))
        .prop_filter("suffixes are not names", |s| !matches!(s.as_str(), "Jr" | "Sr"))
        .boxed()
}

/// A family name as the generators produce it.
pub fn arb_family_name() -> BoxedStrategy<String> {
    name_part("[A-Z][a-z]{1,10}")
}

/// An initial as BibTeX authors write it: a capital letter, maybe behind a
/// LaTeX accent, maybe wrapped in braces, maybe followed by a period.
pub fn arb_initial() -> BoxedStrategy<String> {
    (
        "[A-Z]",
        prop::sample::select(vec!["", "\\'", "\\\"", "\\`", "\\^", "\\~", "\\v", "\\c"]),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(letter, accent, braced, period)| {
            let glyph = match accent {
                "" => letter,
                // control words take their argument in braces
                "\\v" | "\\c" => format!("{accent}{{{letter}}}"),
                _ => format!("{accent}{letter}"),
            };
            let glyph = if braced { format!("{{{glyph}}}") } else { glyph };
            if period {
                format!("{glyph}.")
            } else {
                glyph
            }
        })
        .boxed()
}

pub fn arb_paper_plan(venue_count: usize) -> BoxedStrategy<PaperPlan> {
    (
        prop::collection::vec(
            (name_part("[A-Z][a-z]{2,8}"), arb_family_name()),
            1..=3,
        ),
        0..venue_count,
        1950u32..2030,
        "[a-z]{3,8}( [a-z]{2,8}){0,4}",
    )
        .prop_map(|(authors, venue, year, title)| PaperPlan {
            authors,
            venue,
            year,
            title,
        })
        .boxed()
}

/// Renders a plan as a raw record, varying author layout and venue spelling.
pub fn arb_raw_record(plan: PaperPlan, table: &VenueTable) -> BoxedStrategy<Record> {
    let venue = table.venues()[plan.venue].clone();
    let spellings: Vec<String> = venue.spellings().map(str::to_string).collect();

    (
        prop::collection::vec(any::<bool>(), plan.authors.len()),
        0..spellings.len(),
        any::<bool>(),
        "[a-z]{1,6}[0-9]{0,2}",
    )
        .prop_map(move |(comma_layout, spelling_idx, wrap, key)| {
            let author = plan
                .authors
                .iter()
                .zip(&comma_layout)
                .map(|((given, family), comma)| {
                    if *comma {
                        format!("{family}, {given}")
                    } else {
                        format!("{given} {family}")
                    }
                })
                .collect::<Vec<_>>()
                .join(" and ");

            let spelling = &spellings[spelling_idx];
            let booktitle = if wrap {
                format!("Proceedings of the {{{spelling}}} {}", plan.year)
            } else {
                spelling.clone()
            };

            Record::new("inproceedings", key)
                .with_field(AUTHOR, author)
                .with_field(BOOKTITLE, booktitle)
                .with_field(YEAR, plan.year.to_string())
                .with_field(TITLE, plan.title.clone())
        })
        .boxed()
}

/// A plan together with one raw rendering of it.
pub fn arb_paper(table: VenueTable) -> BoxedStrategy<(PaperPlan, Record)> {
    let venue_count = table.len();
    arb_paper_plan(venue_count)
        .prop_flat_map(move |plan| {
            let raw = arb_raw_record(plan.clone(), &table);
            (Just(plan), raw)
        })
        .boxed()
}

/// A list of raw records where some papers appear more than once, possibly
/// spelled differently, and some records are broken.
pub fn arb_bibliography(table: VenueTable, max_papers: usize) -> BoxedStrategy<Vec<Record>> {
    prop::collection::vec(
        (
            arb_paper(table),
            0usize..3,
            prop::sample::select(vec!["", "abbreviate", "venue", "year"]),
        ),
        0..=max_papers,
    )
    .prop_map(|papers| {
        let mut records = Vec::new();
        for ((plan, raw), copies, breakage) in papers {
            let mut record = raw;
            match breakage {
                "abbreviate" => {
                    let (given, family) = &plan.authors[0];
                    record.set(AUTHOR, format!("{}. {family}", &given[..1]));
                }
                "venue" => record.set(BOOKTITLE, "Workshop on Unlisted Topics"),
                "year" => record.set(YEAR, "in press"),
                _ => {}
            }
            for _ in 0..=copies {
                records.push(record.clone());
            }
        }
        records
    })
    .boxed()
}

/// A field value with balanced brace groups, possibly nested.
pub fn arb_field_value() -> BoxedStrategy<String> {
    let text = "[A-Za-z0-9 .,:'@%\"-]{0,12}";
    let group = (text, prop::option::of(text), text).prop_map(|(a, inner, b)| match inner {
        Some(inner) => format!("{{{a}{{{inner}}}{b}}}"),
        None => format!("{{{a}{b}}}"),
    });
    (text, prop::option::of(group), text)
        .prop_map(|(head, group, tail)| format!("{head}{}{tail}", group.unwrap_or_default()))
        .boxed()
}

/// Records whose values are text the BibTeX writer emits verbatim.
pub fn arb_plain_record() -> BoxedStrategy<Record> {
    (
        "[a-z]{3,10}".prop_filter("blocks without records", |t| {
            !matches!(t.as_str(), "comment" | "preamble" | "string")
        }),
        "[a-z][a-z0-9:_-]{0,12}",
        prop::collection::btree_map("[a-z]{2,10}", arb_field_value(), 0..6),
    )
        .prop_map(|(entry_type, key, fields)| {
            let mut record = Record::new(entry_type, key);
            for (name, value) in fields {
                record.set(&name, value);
            }
            record
        })
        .boxed()
}
