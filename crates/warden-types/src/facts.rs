//! The facts mapping evaluated by rules and checkers
//!
//! Facts are an arbitrary JSON tree keyed by strings. Rule conditions
//! address values by dotted path (`user.role`); a missing segment resolves
//! to nothing rather than failing, which the expression evaluator maps to
//! its `undefined` sentinel.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input mapping for one pipeline invocation
///
/// Backed by `serde_json::Map`, which is BTree-ordered, so serialising a
/// `Facts` value emits lexicographically sorted keys at every nesting
/// level. The canonical hash pre-image relies on this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(Map<String, Value>);

impl Facts {
    /// Create an empty facts mapping
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build facts from any JSON value; non-objects become the empty mapping
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    /// Insert a top-level fact
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Resolve a dotted path against the tree
    ///
    /// Returns `None` when any segment is missing or when an intermediate
    /// value is not an object.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Whether any top-level key contains one of the given fragments
    /// (case-insensitive)
    pub fn has_key_containing(&self, fragments: &[&str]) -> bool {
        self.0.keys().any(|key| {
            let lowered = key.to_lowercase();
            fragments.iter().any(|f| lowered.contains(&f.to_lowercase()))
        })
    }

    /// First value whose top-level key contains the fragment (case-insensitive)
    pub fn value_for_key_containing(&self, fragment: &str) -> Option<&Value> {
        let needle = fragment.to_lowercase();
        self.0
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(_, value)| value)
    }

    /// Shallow merge: clone this mapping and overlay the given key
    pub fn merged(&self, key: impl Into<String>, value: Value) -> Self {
        let mut map = self.0.clone();
        map.insert(key.into(), value);
        Self(map)
    }

    /// Number of top-level facts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no facts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Facts {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
