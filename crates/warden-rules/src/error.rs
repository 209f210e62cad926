//! Rule-engine errors

use thiserror::Error;
use warden_expr::ExprError;

/// Errors raised while loading or validating rules
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule's condition failed to parse; rules fail fast at load
    #[error("Rule '{rule_id}' has an invalid condition: {source}")]
    InvalidCondition {
        rule_id: String,
        #[source]
        source: ExprError,
    },

    /// Two rules share an identifier
    #[error("Duplicate rule id '{0}'")]
    DuplicateId(String),

    /// A score override outside [0, 100]
    #[error("Rule '{rule_id}' has score {score}, expected 0-100")]
    ScoreOutOfRange { rule_id: String, score: u8 },

    /// The rules document is not a JSON array of rules
    #[error("Invalid rules document: {0}")]
    InvalidRulesDocument(#[from] serde_json::Error),
}

/// Result alias for rule-engine operations
pub type Result<T> = std::result::Result<T, RuleError>;
