//! Compliance report shapes shared by checkers and the pipeline

use serde::{Deserialize, Serialize};

/// Regulatory framework evaluated by a checker
///
/// `Adgm` is accepted in configuration for forward compatibility; no
/// checker currently ships for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "PDPL")]
    Pdpl,
    #[serde(rename = "UAE_AI_ETHICS")]
    UaeAiEthics,
    #[serde(rename = "NESA")]
    Nesa,
    #[serde(rename = "DUBAI_AI_LAW")]
    DubaiAiLaw,
    #[serde(rename = "ADGM")]
    Adgm,
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Framework::Pdpl => "PDPL",
            Framework::UaeAiEthics => "UAE_AI_ETHICS",
            Framework::Nesa => "NESA",
            Framework::DubaiAiLaw => "DUBAI_AI_LAW",
            Framework::Adgm => "ADGM",
        };
        f.write_str(label)
    }
}

/// Status of one control check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Compliant,
    NonCompliant,
    ReviewRequired,
}

impl CheckStatus {
    /// Precedence when folding checks into an overall status:
    /// NON_COMPLIANT > REVIEW_REQUIRED > COMPLIANT
    pub fn combine(self, other: CheckStatus) -> CheckStatus {
        use CheckStatus::*;
        match (self, other) {
            (NonCompliant, _) | (_, NonCompliant) => NonCompliant,
            (ReviewRequired, _) | (_, ReviewRequired) => ReviewRequired,
            (Compliant, Compliant) => Compliant,
        }
    }
}

/// A single framework control result, bilingual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub framework: Framework,
    /// Control identifier, e.g. "Art. 6" or "AC-01"
    pub article: String,
    pub status: CheckStatus,
    pub requirement: String,
    pub requirement_ar: String,
    /// Invariant: `passed` iff `status == COMPLIANT`
    pub passed: bool,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_ar: Option<String>,
}

impl ComplianceCheck {
    /// Construct a check, deriving `passed` from the status
    pub fn new(
        framework: Framework,
        article: impl Into<String>,
        status: CheckStatus,
        requirement: impl Into<String>,
        requirement_ar: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            framework,
            article: article.into(),
            status,
            requirement: requirement.into(),
            requirement_ar: requirement_ar.into(),
            passed: status == CheckStatus::Compliant,
            details: details.into(),
            remediation: None,
            remediation_ar: None,
        }
    }

    /// Attach bilingual remediation guidance (for failed checks)
    pub fn with_remediation(
        mut self,
        remediation: impl Into<String>,
        remediation_ar: impl Into<String>,
    ) -> Self {
        self.remediation = Some(remediation.into());
        self.remediation_ar = Some(remediation_ar.into());
        self
    }
}

/// Aggregate of all checks run for one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub report_id: String,
    pub timestamp: String,
    pub overall_status: CheckStatus,
    pub frameworks: Vec<Framework>,
    pub checks: Vec<ComplianceCheck>,
    /// Percentage of passed checks, rounded half-up; 100 when empty
    pub score: u8,
    pub summary: String,
    pub summary_ar: String,
    pub audit_hash: String,
}
