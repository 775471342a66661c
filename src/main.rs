//! # adforge command-line entry point
//!
//! Parses arguments, installs tracing, then hands the command to [`cli::run`].
//! Logs go to stderr; CSV, JSON and reports go to stdout.
//!
//! ```bash
//! adforge build --settings settings.json --keywords keywords.txt -o structure.json
//! adforge export plumbing.export.json --output plumbing.csv
//! adforge validate plumbing.csv
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Reports are printed to stdout

mod cli;

use adforge::logging;
use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.log_options())?;

    cli::run(cli)
}
