//! Shared data model for the warden governed-agent runtime
//!
//! Every crate in the workspace speaks in terms of these types: facts
//! evaluated by the rule engine, decisions produced by it, audit entries
//! chained into the journal, and compliance reports attached to both.

#![deny(unsafe_code)]

pub mod audit;
pub mod canonical;
pub mod compliance;
pub mod decision;
pub mod error;
pub mod facts;
pub mod hash;
pub mod ids;

pub use audit::AuditEntry;
pub use compliance::{
    CheckStatus, ComplianceCheck, ComplianceReport, Framework,
};
pub use decision::{Action, Decision, Rule};
pub use error::TypeError;
pub use facts::Facts;
pub use hash::{chain_hash, sha256_hex, GENESIS_HASH};
pub use ids::{new_audit_id, new_report_id, now_iso_millis};
