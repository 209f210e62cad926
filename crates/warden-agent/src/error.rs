//! Pipeline errors

use thiserror::Error;

/// Errors the pipeline surfaces to its caller
///
/// Policy outcomes (a REJECTED rule, a failing compliance check) are data,
/// not errors; journal write degradation is logged and swallowed. What
/// remains is the model adapter failing and serialisation bugs.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The LM adapter reported failure; the pre-check entry has already
    /// been persisted by the time this is raised
    #[error("Language model call failed: {0}")]
    Lm(String),

    #[error(transparent)]
    Audit(#[from] warden_audit::AuditError),

    #[error(transparent)]
    Canonical(#[from] warden_types::TypeError),
}

/// Result alias for pipeline operations
pub type Result<T> = std::result::Result<T, AgentError>;
