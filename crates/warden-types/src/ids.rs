//! Identifier and timestamp helpers

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Fresh unique identifier for a decision's audit trail
pub fn new_audit_id() -> String {
    format!("audit-{}", Uuid::new_v4())
}

/// Fresh unique identifier for a compliance report
pub fn new_report_id() -> String {
    format!("report-{}", Uuid::new_v4())
}

/// Current UTC time as ISO-8601 with millisecond precision
///
/// The journal compares timestamps as strings, so every producer must use
/// this exact format.
pub fn now_iso_millis() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
