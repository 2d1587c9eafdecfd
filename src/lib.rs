//! bibcanon: canonical BibTeX for conference papers.
//!
//! bibcanon reads `@inproceedings` entries and rewrites them into one
//! canonical form: full "Given Family" author names, conference names taken
//! from a fixed venue table, four-digit years, title-cased titles, and
//! citation keys of the form `doe2014icse`. Entries that cannot be
//! canonicalized are kept as authored and reported; entries that end up
//! with the same key are written once.
//!
//! # Modules
//!
//! - [`record`]: Record type and BibTeX reader/writer
//! - [`venue`]: Venue table, YAML loading, and matching strategies
//! - [`canon`]: Field canonicalizers (names, years, titles, keys)
//! - [`classify`]: Per-record classification into valid or invalid
//! - [`dedup`]: Duplicate removal by canonical key
//! - [`pipeline`]: Classify-then-deduplicate driver and run report
//! - [`error`]: Error types for bibcanon operations

pub mod canon;
pub mod classify;
pub mod dedup;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod venue;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use error::BibError;

use classify::Classifier;
use pipeline::{run_pipeline, FormatReport, PipelineOutput};
use record::io_bibtex::{read_bibtex, write_bibtex, write_bibtex_with_notes};
use record::Record;
use venue::{ContainmentMatcher, ExactMatcher, VenueTable};

/// The bibcanon CLI application.
#[derive(Parser)]
#[command(name = "bibcanon")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG
    /// takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Canonicalize a .bib file into valid and invalid output files.
    Format(FormatArgs),
    /// Report what formatting would do, without writing files.
    Check(CheckArgs),
    /// List the active venue table in match order.
    Venues(VenuesArgs),
}

/// Where venues come from and how they are matched.
#[derive(clap::Args)]
struct VenueSourceArgs {
    /// YAML venue table (defaults to the built-in table).
    #[arg(long, env = "BIBCANON_VENUES")]
    venues: Option<PathBuf>,

    /// Venue matching strategy.
    #[arg(long, value_enum, default_value_t = MatcherArg::Containment)]
    matcher: MatcherArg,
}

/// Arguments for the venues subcommand.
#[derive(clap::Args)]
struct VenuesArgs {
    /// YAML venue table (defaults to the built-in table).
    #[arg(long, env = "BIBCANON_VENUES")]
    venues: Option<PathBuf>,
}

/// Arguments for the format subcommand.
#[derive(clap::Args)]
struct FormatArgs {
    /// Input .bib file.
    input: PathBuf,

    /// Output file for canonical records.
    #[arg(long, default_value = "validBib.bib")]
    valid_out: PathBuf,

    /// Output file for records that need a manual fix.
    #[arg(long, default_value = "invalidBib.bib")]
    invalid_out: PathBuf,

    #[command(flatten)]
    source: VenueSourceArgs,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Exit non-zero if any record is invalid.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Input .bib file.
    input: PathBuf,

    #[command(flatten)]
    source: VenueSourceArgs,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MatcherArg {
    /// Whole-word containment in either direction.
    Containment,
    /// Exact match against a canonical name or alias.
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the bibcanon CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BibError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Format(args)) => run_format(args),
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Venues(args)) => run_venues(args),
        None => {
            println!("bibcanon {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Canonicalize and deduplicate BibTeX conference papers.");
            println!();
            println!("Run 'bibcanon --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the format subcommand.
fn run_format(args: FormatArgs) -> Result<(), BibError> {
    let output = process(&args.input, &args.source)?;

    write_bibtex(&args.valid_out, &output.valid)?;
    let annotated: Vec<(&Record, Vec<String>)> = output
        .invalid
        .iter()
        .map(|rejected| {
            let notes = rejected
                .issues
                .iter()
                .map(|issue| format!("invalid: {issue}"))
                .collect();
            (&rejected.record, notes)
        })
        .collect();
    write_bibtex_with_notes(&args.invalid_out, &annotated)?;

    print_report(&output.report, args.report)?;
    if args.report == ReportFormat::Text {
        println!();
        println!(
            "Wrote {} record(s) to {}",
            output.valid.len(),
            args.valid_out.display()
        );
        println!(
            "Wrote {} record(s) to {}",
            output.invalid.len(),
            args.invalid_out.display()
        );
    }

    if args.strict && !output.report.is_clean() {
        return Err(failed(output.report));
    }
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), BibError> {
    let output = process(&args.input, &args.source)?;
    print_report(&output.report, args.report)?;

    if output.report.is_clean() {
        Ok(())
    } else {
        Err(failed(output.report))
    }
}

/// Execute the venues subcommand.
fn run_venues(args: VenuesArgs) -> Result<(), BibError> {
    let table = load_venues(args.venues.as_deref())?;
    for (idx, venue) in table.venues().iter().enumerate() {
        if venue.aliases.is_empty() {
            println!("{:>3}. {}: {}", idx + 1, venue.abbreviation, venue.name);
        } else {
            println!(
                "{:>3}. {}: {} (aliases: {})",
                idx + 1,
                venue.abbreviation,
                venue.name,
                venue.aliases.join(", ")
            );
        }
    }
    Ok(())
}

fn process(input: &Path, source: &VenueSourceArgs) -> Result<PipelineOutput, BibError> {
    let records = read_bibtex(input)?;
    let table = load_venues(source.venues.as_deref())?;
    tracing::info!(
        records = records.len(),
        venues = table.len(),
        input = %input.display(),
        "read input"
    );

    Ok(match source.matcher {
        MatcherArg::Containment => run_pipeline(
            &records,
            &Classifier::with_matcher(&table, ContainmentMatcher),
        ),
        MatcherArg::Exact => {
            run_pipeline(&records, &Classifier::with_matcher(&table, ExactMatcher))
        }
    })
}

fn load_venues(path: Option<&Path>) -> Result<VenueTable, BibError> {
    match path {
        Some(path) => venue::read_venue_table(path),
        None => venue::default_venue_table(),
    }
}

fn print_report(report: &FormatReport, format: ReportFormat) -> Result<(), BibError> {
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn failed(report: FormatReport) -> BibError {
    BibError::FormatFailed {
        invalid_count: report.invalid_count,
        report: Box::new(report),
    }
}
