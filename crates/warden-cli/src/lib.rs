//! Warden CLI: validate rule files and decide over facts
//!
//! Exit codes: 0 on success (a REVIEW decision included), 1 when
//! validation finds invalid rules or conflicts, 2 on malformed input.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// Warden: governed-agent policy runtime
#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Policy decisions with a tamper-evident audit trail", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every rule in a file and report conflicts
    Validate {
        /// Path to a JSON array of rules
        rules: PathBuf,
    },

    /// Evaluate facts against rules and append to the audit journal
    Decide {
        /// Path to a JSON array of rules
        rules: PathBuf,
        /// Path to a JSON object of facts
        facts: PathBuf,
    },
}

/// Run using the current process arguments; returns the exit code
pub async fn run() -> CliResult<u8> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided arguments; returns the exit code
pub async fn run_with_args<I, T>(args: I) -> CliResult<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .try_init();

    match cli.command {
        Commands::Validate { rules } => commands::validate::execute(&rules, cli.output),
        Commands::Decide { rules, facts } => {
            commands::decide::execute(&rules, &facts, cli.output).await
        }
    }
}
