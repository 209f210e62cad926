//! Audit journal errors

use thiserror::Error;

/// Errors raised by journal construction and disk replay
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Journal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A journal line failed to parse; construction aborts rather than
    /// silently forking the chain
    #[error("Malformed journal line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Canonical(#[from] warden_types::TypeError),
}

/// Result alias for journal operations
pub type Result<T> = std::result::Result<T, AuditError>;
