//! CLI errors and their exit codes

use thiserror::Error;

/// Failures the CLI reports to the operator
#[derive(Debug, Error)]
pub enum CliError {
    /// Rules or facts file was missing or unreadable
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rules or facts file did not parse into the expected shape
    #[error("Malformed input in {path}: {detail}")]
    MalformedInput { path: String, detail: String },

    #[error(transparent)]
    Audit(#[from] warden_audit::AuditError),

    #[error(transparent)]
    Rules(#[from] warden_rules::RuleError),
}

impl CliError {
    /// 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Unreadable { .. } | CliError::MalformedInput { .. } => 2,
            _ => 1,
        }
    }
}

/// Result alias for CLI operations
pub type CliResult<T> = std::result::Result<T, CliError>;
