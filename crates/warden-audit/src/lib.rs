//! Tamper-evident audit journal
//!
//! An append-only, line-delimited JSON journal where every entry carries
//! the SHA-256 of its predecessor. Deleting, reordering, or editing any
//! past line is detectable by recomputing the chain from the genesis hash.
//!
//! Writes are serialised by a single writer lock held across both the
//! chain-pointer update and the file append; readers never need it.

#![deny(unsafe_code)]

mod error;
mod export;
mod filter;
mod log;
mod verify;

pub use error::{AuditError, Result};
pub use filter::AuditFilter;
pub use log::AuditLog;
pub use verify::{ChainFault, FaultKind};

use std::path::PathBuf;

/// Journal location from `AUDIT_PATH`, defaulting to `./data/audit.jsonl`
pub fn default_journal_path() -> PathBuf {
    std::env::var("AUDIT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data/audit.jsonl"))
}
