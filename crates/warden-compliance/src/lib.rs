//! Multi-framework compliance evaluation
//!
//! For every pipeline invocation a configurable set of framework checkers
//! runs over the input, the decision, and the sealed audit entry, producing
//! a signed bilingual report. Checkers are pattern-matching heuristics over
//! the canonical JSON of the input, not legal opinions; they deliberately
//! preserve the approximate substring semantics of the original controls
//! (a field named `password_policy_version` will trip the credential
//! marker, and that is the documented contract).

#![deny(unsafe_code)]

mod checker;
mod config;
mod detect;
mod engine;
mod error;
mod frameworks;

pub use checker::{CheckContext, FrameworkChecker};
pub use config::{AuditLevel, ComplianceConfig, DataResidency, Language};
pub use engine::{ComplianceEngine, QuickCheck};
pub use error::{ComplianceError, Result};
pub use frameworks::{
    AiEthicsChecker, DubaiAiLawChecker, NesaChecker, PdplChecker,
};
