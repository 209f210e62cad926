//! Parse-time errors for the predicate language

use thiserror::Error;

/// Syntax errors raised while compiling a condition
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExprError {
    #[error("Unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Invalid number literal '{literal}' at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },

    #[error("Unexpected token {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        offset: usize,
    },

    #[error("Unexpected end of condition, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Trailing input after expression at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("Empty condition")]
    Empty,
}

/// Result alias for compilation
pub type Result<T> = std::result::Result<T, ExprError>;
