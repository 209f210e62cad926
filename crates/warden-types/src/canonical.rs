//! Canonical JSON serialisation for hash pre-images
//!
//! Hashing requires a byte-exact encoding: object keys sorted
//! lexicographically at every nesting level, compact separators, JSON
//! string escaping, shortest number form. Round-tripping through
//! `serde_json::Value` provides exactly this because the crate's map type
//! is BTree-ordered.

use serde::Serialize;

use crate::error::Result;

/// Canonical JSON string of any serialisable value
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let tree = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&tree)?)
}
