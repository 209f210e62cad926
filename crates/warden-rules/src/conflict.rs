//! Pairwise conflict detection over a rule set

use serde::Serialize;
use warden_types::Rule;

/// How two rules relate when their conditions are textually identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    /// Same condition, different action: only one can be intended
    ActionMismatch,
    /// Same condition, same action: redundant but harmless
    Duplicate,
}

/// A detected relationship between two rules
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConflict {
    pub rule_a: String,
    pub rule_b: String,
    pub kind: ConflictKind,
    pub description: String,
}

impl RuleConflict {
    /// Whether this finding is an actual conflict rather than informational
    pub fn is_conflict(&self) -> bool {
        self.kind == ConflictKind::ActionMismatch
    }
}

/// Compare every pair of rules; conditions are compared byte-equal after
/// trimming
pub(crate) fn detect(rules: &[&Rule]) -> Vec<RuleConflict> {
    let mut findings = Vec::new();
    for (i, a) in rules.iter().enumerate() {
        for b in rules.iter().skip(i + 1) {
            if a.condition.trim() != b.condition.trim() {
                continue;
            }
            if a.action != b.action {
                findings.push(RuleConflict {
                    rule_a: a.id.clone(),
                    rule_b: b.id.clone(),
                    kind: ConflictKind::ActionMismatch,
                    description: format!(
                        "Rules '{}' and '{}' share the condition {:?} but disagree: {} vs {}",
                        a.id,
                        b.id,
                        a.condition.trim(),
                        a.action,
                        b.action
                    ),
                });
            } else {
                findings.push(RuleConflict {
                    rule_a: a.id.clone(),
                    rule_b: b.id.clone(),
                    kind: ConflictKind::Duplicate,
                    description: format!(
                        "Rules '{}' and '{}' duplicate the condition {:?} with the same action",
                        a.id,
                        b.id,
                        a.condition.trim()
                    ),
                });
            }
        }
    }
    findings
}
