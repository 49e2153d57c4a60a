//! fakemetrics - views/likes anomaly pipeline CLI
//!
//! Usage:
//!   fakemetrics run                           # synthesize 1000 rows and score them
//!   fakemetrics run --method lof --json       # LOF, summary as JSON
//!   fakemetrics run --config pipeline.toml    # settings from a TOML file
//!   fakemetrics run --persist                 # also write raw and clean CSVs
//!   fakemetrics describe data/raw/dataset.csv # per-column statistics

use clap::{Parser, Subcommand};
use fakemetrics::anomaly::DetectionMethod;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{describe, run};

/// fakemetrics - flag suspicious views/likes rows
///
/// Loads (or synthesizes) a views/likes table, cleans and standardizes it,
/// and labels outliers with Isolation Forest or Local Outlier Factor.
#[derive(Parser)]
#[command(name = "fakemetrics")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and print the summary
    Run {
        /// TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Rows to synthesize when no raw file exists
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Seed for the generator and the isolation forest
        #[arg(long)]
        seed: Option<u64>,

        /// Expected outlier share, in (0, 0.5]
        #[arg(long)]
        contamination: Option<f64>,

        /// Detection method(s): isolation_forest, lof
        #[arg(short, long, value_delimiter = ',')]
        method: Vec<DetectionMethod>,

        /// Write synthesized and cleaned datasets to disk
        #[arg(long)]
        persist: bool,

        /// Raw CSV path
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,

        /// Cleaned CSV path (used as a cache when present)
        #[arg(long, value_name = "FILE")]
        clean: Option<PathBuf>,
    },

    /// Print per-column statistics of a CSV file
    Describe {
        /// CSV file with a header row
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run {
            config,
            samples,
            seed,
            contamination,
            method,
            persist,
            raw,
            clean,
        } => run::run(
            &run::RunArgs {
                config,
                samples,
                seed,
                contamination,
                methods: method,
                persist,
                raw,
                clean,
            },
            cli.json,
        ),

        Commands::Describe { file } => describe::run(&file, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            e.exit_code()
        }
    }
}
