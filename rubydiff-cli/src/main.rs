//! rubydiff CLI - structural diff for Ruby code.
//!
//! Compares two Ruby files or two directory trees at the declaration
//! level (modules, classes, methods, accessor-style members) and reports
//! added, removed, and modified declarations, ignoring formatting and
//! comment changes.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod diff;
mod output;

use output::OutputFormat;

/// Structural diff for Ruby code.
///
/// rubydiff builds a logical model of each source version (classes,
/// methods, attr_* members) and diffs the models by declaration
/// signature, so reformatting and comment edits never show up as
/// changes.
#[derive(Parser)]
#[command(name = "rubydiff")]
#[command(author, version)]
#[command(about = "Structural diff for Ruby code")]
#[command(after_help = "Exit codes:
  0  no structural changes
  1  structural changes found
  2  error (unreadable input, parse failure)

Examples:
  rubydiff old.rb new.rb
  rubydiff --format json v1/ v2/
  rubydiff --include-unchanged old.rb new.rb")]
pub struct Cli {
    /// Base version: a Ruby file or a directory tree
    base: String,

    /// Head version: a Ruby file or a directory tree
    head: String,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Include unchanged declarations in the report
    #[arg(long)]
    include_unchanged: bool,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let format = cli.format.unwrap_or_default();
    match diff::run(&cli.base, &cli.head, format, cli.include_unchanged) {
        Ok(true) => std::process::exit(1),
        Ok(false) => {}
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(2);
        }
    }
}
