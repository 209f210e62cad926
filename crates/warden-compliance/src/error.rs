//! Compliance evaluation errors

use thiserror::Error;
use warden_types::Framework;

/// A checker implementation failure
///
/// Never aborts the pipeline: the engine folds it into a degenerate
/// REVIEW_REQUIRED report instead.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("{framework} checker failed: {message}")]
    CheckerFailed {
        framework: Framework,
        message: String,
    },

    #[error("Report serialisation failed: {0}")]
    Serialisation(#[from] warden_types::TypeError),
}

/// Result alias for checker implementations
pub type Result<T> = std::result::Result<T, ComplianceError>;
