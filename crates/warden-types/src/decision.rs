//! Rules and the decisions they produce

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceReport;
use crate::ids::new_audit_id;

/// Outcome class of a rule or a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Approved,
    Rejected,
    Review,
}

impl Action {
    /// Decision score used when the matched rule carries no override
    pub fn default_score(&self) -> u8 {
        match self {
            Action::Approved => 85,
            Action::Rejected => 15,
            Action::Review => 50,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Action::Approved => "APPROVED",
            Action::Rejected => "REJECTED",
            Action::Review => "REVIEW",
        };
        f.write_str(label)
    }
}

/// A single predicate-with-action policy unit
///
/// The `condition` is kept verbatim; the rule engine compiles it at load
/// time and rejects rules whose condition fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub condition: String,
    pub action: Action,
    pub reason: String,
    /// Lower numeric value wins; ties resolve by insertion order
    pub priority: i32,
    /// Optional override for the decision score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl Rule {
    /// Score a decision produced by this rule should carry
    pub fn decision_score(&self) -> u8 {
        self.score.unwrap_or_else(|| self.action.default_score())
    }
}

/// Outcome of evaluating facts against a rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub result: Action,
    pub matched_rule: Option<Rule>,
    pub reason: String,
    pub score: u8,
    pub audit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_report: Option<ComplianceReport>,
}

impl Decision {
    /// Decision produced by a matched rule
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            result: rule.action,
            reason: rule.reason.clone(),
            score: rule.decision_score(),
            matched_rule: Some(rule.clone()),
            audit_id: new_audit_id(),
            compliance_report: None,
        }
    }

    /// Default decision when no rule matches: manual review
    pub fn unmatched_review() -> Self {
        Self {
            result: Action::Review,
            matched_rule: None,
            reason: "No matching rule found — manual review required".to_string(),
            score: Action::Review.default_score(),
            audit_id: new_audit_id(),
            compliance_report: None,
        }
    }

    /// Synthetic review decision recorded when a run is cancelled
    pub fn cancelled_review() -> Self {
        Self {
            result: Action::Review,
            matched_rule: None,
            reason: "cancelled".to_string(),
            score: Action::Review.default_score(),
            audit_id: new_audit_id(),
            compliance_report: None,
        }
    }

    /// Confidence in [0, 1]: an explicit `confidence` is not part of the
    /// decision shape, so this derives from the score
    pub fn confidence(&self) -> f64 {
        f64::from(self.score) / 100.0
    }
}
