//! # pda-extract
//!
//! A command-line tool for extracting experiment metadata from SoftMax Pro
//! `.pda` exports.
//!
//! ## Usage
//!
//! ```bash
//! # Print the merged parameter set as JSON
//! pda-extract extract "050511V1 Pmutants rep1.pda" --pretty
//!
//! # One parameter set per experiment section
//! pda-extract extract run.pda --per-section
//!
//! # Many files, one JSON record per line
//! pda-extract batch data/*.pda > params.jsonl
//!
//! # Generate a two-section demo file
//! pda-extract demo demo.pda --sections 2
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
