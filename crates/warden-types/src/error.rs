//! Errors shared across the data model

use thiserror::Error;

/// Errors raised while serialising or hashing data-model values
#[derive(Debug, Error)]
pub enum TypeError {
    /// A value could not be serialised to canonical JSON
    #[error("Canonical serialisation failed: {0}")]
    Canonical(#[from] serde_json::Error),
}

/// Result alias for data-model operations
pub type Result<T> = std::result::Result<T, TypeError>;
