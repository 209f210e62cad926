//! Output format selection

use clap::ValueEnum;

/// How command results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
