//! Rule engine: compiles a rule set and evaluates facts against it
//!
//! Rules are validated at load time (a condition that fails to parse
//! rejects the load), sorted by ascending priority with insertion order
//! breaking ties, and evaluated first-match-wins. The compiled set is
//! replaced by pointer swap, so concurrent readers always see either the
//! old complete set or the new one.

#![deny(unsafe_code)]

mod conflict;
mod engine;
mod error;

pub use conflict::{ConflictKind, RuleConflict};
pub use engine::RuleEngine;
pub use error::{RuleError, Result};

use warden_types::Rule;

/// Parse a JSON rules document (an array of rules)
pub fn parse_rules(json: &str) -> Result<Vec<Rule>> {
    serde_json::from_str(json).map_err(RuleError::InvalidRulesDocument)
}
