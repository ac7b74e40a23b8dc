use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod batch;
mod config;
mod demo;
mod extract;
mod inspect;

pub use config::Config;

/// pda-extract - SoftMax Pro .pda metadata extractor
#[derive(Parser)]
#[command(name = "pda-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the parameter set of one .pda file as JSON
    Extract {
        /// Input .pda file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Report one parameter set per experiment section
        #[arg(long)]
        per_section: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Extract many files, one JSON record per line
    Batch {
        /// Input .pda files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display the sections and parameters of a .pda file
    Inspect {
        /// Input .pda file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write a synthetic FlexStation III export for testing
    Demo {
        /// Output .pda file path
        #[arg(value_name = "OUTPUT", default_value = "demo_flexstation.pda")]
        output: PathBuf,

        /// Number of experiment sections to write
        #[arg(short, long, default_value = "1")]
        sections: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            file,
            config,
            per_section,
            pretty,
            output,
        } => extract::run(file, config, per_section, pretty, output),
        Commands::Batch { files, config } => batch::run(files, config),
        Commands::Inspect { file } => inspect::run(file),
        Commands::Demo { output, sections } => demo::run(output, sections),
    }
}
