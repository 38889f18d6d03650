//! CLI tool to run an operations file against the county dataset.
//!
//! Usage:
//!   county-report <operations-file>
//!   county-report --data counties.json <operations-file>
//!
//! Reports go to stdout; logs and fatal errors go to stderr.

use clap::Parser;
use county_report::{DEFAULT_DATA_FILE, Interpreter, load_counties, read_script};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run an operations file against county demographic data.
#[derive(Parser)]
#[command(name = "county-report", version)]
struct Cli {
    /// Operations file, one operation per line
    operations: PathBuf,

    /// County data file (JSON)
    #[arg(short, long, env = "COUNTY_DATA", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Log each operation and the run summary on stderr (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    // Usage errors exit 1; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            if let Err(print_err) = e.print() {
                eprintln!("Error writing usage: {print_err}");
            }
            return code;
        }
    };

    init_logging(cli.verbose);

    let counties = match load_counties(&cli.data) {
        Ok(counties) => counties,
        Err(e) => {
            eprintln!("Error loading data: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = writeln!(out, "Loaded data with {} entries", counties.len()) {
        eprintln!("Error writing output: {e}");
        return ExitCode::FAILURE;
    }

    let script = match read_script(&cli.operations) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Interpreter::new(counties).run(&script, &mut out) {
        Ok(summary) => {
            info!(
                operations = summary.steps.len(),
                errors = summary.error_count(),
                remaining = summary.final_count,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing output: {e}");
            ExitCode::FAILURE
        }
    }
}
