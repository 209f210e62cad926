//! Compliance evaluation configuration

use serde::{Deserialize, Serialize};
use warden_types::Framework;

/// Which summary languages the report populates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
    Both,
}

/// How thorough the checkers are
///
/// At `Basic`, checkers may omit their low-severity controls; at `Full`
/// every control runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Basic,
    Full,
}

/// Where processed data must reside; governs the PDPL residency control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataResidency {
    Uae,
    Any,
}

/// Configuration for one compliance engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceConfig {
    /// Frameworks to evaluate, in report order. `ADGM` is accepted but
    /// currently contributes no checks.
    pub frameworks: Vec<Framework>,
    pub language: Language,
    pub audit_level: AuditLevel,
    pub data_residency: DataResidency,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            frameworks: vec![
                Framework::Pdpl,
                Framework::UaeAiEthics,
                Framework::Nesa,
                Framework::DubaiAiLaw,
            ],
            language: Language::Both,
            audit_level: AuditLevel::Full,
            data_residency: DataResidency::Any,
        }
    }
}

impl ComplianceConfig {
    /// Restrict to a subset of frameworks
    pub fn with_frameworks(mut self, frameworks: Vec<Framework>) -> Self {
        self.frameworks = frameworks;
        self
    }

    /// Set the summary language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the audit level
    pub fn with_audit_level(mut self, level: AuditLevel) -> Self {
        self.audit_level = level;
        self
    }

    /// Require UAE data residency
    pub fn with_uae_residency(mut self) -> Self {
        self.data_residency = DataResidency::Uae;
        self
    }
}
