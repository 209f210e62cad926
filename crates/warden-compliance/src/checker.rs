//! Checker trait and shared evaluation context

use warden_types::canonical::canonical_json;
use warden_types::{AuditEntry, ComplianceCheck, Decision, Facts, Framework};

use crate::config::ComplianceConfig;
use crate::error::Result;

/// Everything a framework checker sees for one evaluation
pub struct CheckContext<'a> {
    pub input: &'a Facts,
    pub decision: &'a Decision,
    /// Absent for quick checks that run before an entry is sealed
    pub entry: Option<&'a AuditEntry>,
    pub config: &'a ComplianceConfig,
    /// Lowercased canonical JSON of the input, the surface all substring
    /// detectors scan
    pub input_text: String,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        input: &'a Facts,
        decision: &'a Decision,
        entry: Option<&'a AuditEntry>,
        config: &'a ComplianceConfig,
    ) -> Self {
        let input_text = canonical_json(input)
            .map(|text| text.to_lowercase())
            .unwrap_or_default();
        Self {
            input,
            decision,
            entry,
            config,
            input_text,
        }
    }

    /// Confidence in [0, 1] derived from the decision score
    pub fn confidence(&self) -> f64 {
        self.decision.confidence()
    }
}

/// One framework's rule family
///
/// Checkers are pure functions of the context; a returned error is folded
/// into a degenerate report by the engine rather than propagated.
pub trait FrameworkChecker: Send + Sync {
    fn framework(&self) -> Framework;
    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<ComplianceCheck>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_lowercases_the_canonical_input() {
        let input = Facts::from_value(json!({ "HealthRecord": "Diabetes" }));
        let decision = Decision::unmatched_review();
        let config = ComplianceConfig::default();
        let ctx = CheckContext::new(&input, &decision, None, &config);
        assert!(ctx.input_text.contains("healthrecord"));
        assert!(ctx.input_text.contains("diabetes"));
        assert!(!ctx.input_text.contains("Health"));
    }

    #[test]
    fn confidence_derives_from_score() {
        let input = Facts::new();
        let mut decision = Decision::unmatched_review();
        decision.score = 85;
        let config = ComplianceConfig::default();
        let ctx = CheckContext::new(&input, &decision, None, &config);
        assert!((ctx.confidence() - 0.85).abs() < f64::EPSILON);
    }
}
