//! Query filters over audit entries

use warden_types::{Action, AuditEntry};

/// Conjunction of optional bounds on timestamp and decision result
///
/// Timestamps are ISO-8601 strings with a fixed shape, so inclusive bounds
/// compare as strings.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub result: Option<Action>,
}

impl AuditFilter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Inclusive lower timestamp bound
    pub fn from(mut self, start: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    /// Inclusive upper timestamp bound
    pub fn until(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    /// Restrict to one decision result
    pub fn result(mut self, result: Action) -> Self {
        self.result = Some(result);
        self
    }

    /// Whether an entry satisfies every configured bound
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref start) = self.start_date {
            if entry.timestamp.as_str() < start.as_str() {
                return false;
            }
        }
        if let Some(ref end) = self.end_date {
            if entry.timestamp.as_str() > end.as_str() {
                return false;
            }
        }
        if let Some(result) = self.result {
            if entry.output.result != result {
                return false;
            }
        }
        true
    }
}
