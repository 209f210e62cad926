//! The compliance aggregator

use serde::Serialize;
use tracing::{debug, warn};

use warden_types::canonical::canonical_json;
use warden_types::{
    new_report_id, now_iso_millis, sha256_hex, AuditEntry, CheckStatus, ComplianceCheck,
    ComplianceReport, Decision, Facts, Framework,
};

use crate::checker::{CheckContext, FrameworkChecker};
use crate::config::{ComplianceConfig, Language};
use crate::error::ComplianceError;
use crate::frameworks::{AiEthicsChecker, DubaiAiLawChecker, NesaChecker, PdplChecker};

/// Result of the lightweight PDPL + AI Ethics pass
#[derive(Debug, Clone)]
pub struct QuickCheck {
    pub passed: bool,
    /// Only NON_COMPLIANT findings are collected
    pub issues: Vec<ComplianceCheck>,
}

/// Runs the configured framework checkers and aggregates a signed report
pub struct ComplianceEngine {
    config: ComplianceConfig,
}

impl ComplianceEngine {
    pub fn new(config: ComplianceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Evaluate all configured frameworks for one decision
    ///
    /// Never fails: a checker error produces a degenerate REVIEW_REQUIRED
    /// report with a synthetic summary instead.
    pub fn evaluate(
        &self,
        input: &Facts,
        decision: &Decision,
        entry: Option<&AuditEntry>,
    ) -> ComplianceReport {
        let ctx = CheckContext::new(input, decision, entry, &self.config);
        let mut checks = Vec::new();

        for framework in &self.config.frameworks {
            let Some(checker) = checker_for(*framework) else {
                debug!(%framework, "no checker shipped for framework, skipping");
                continue;
            };
            match checker.check(&ctx) {
                Ok(mut framework_checks) => checks.append(&mut framework_checks),
                Err(err) => {
                    warn!(%framework, error = %err, "checker failed, degrading report");
                    return self.degenerate_report(&err);
                }
            }
        }

        self.assemble(checks)
    }

    /// Lightweight pass over PDPL and AI Ethics only, collecting
    /// NON_COMPLIANT findings
    pub fn quick_check(&self, input: &Facts, decision: &Decision) -> QuickCheck {
        let ctx = CheckContext::new(input, decision, None, &self.config);
        let mut issues = Vec::new();
        let checkers: [Box<dyn FrameworkChecker>; 2] = [
            Box::new(PdplChecker::new()),
            Box::new(AiEthicsChecker::new()),
        ];
        for checker in checkers {
            if let Ok(checks) = checker.check(&ctx) {
                issues.extend(
                    checks
                        .into_iter()
                        .filter(|c| c.status == CheckStatus::NonCompliant),
                );
            }
        }
        QuickCheck {
            passed: issues.is_empty(),
            issues,
        }
    }

    fn assemble(&self, checks: Vec<ComplianceCheck>) -> ComplianceReport {
        let overall_status = checks
            .iter()
            .fold(CheckStatus::Compliant, |acc, check| acc.combine(check.status));

        let total = checks.len();
        let passed = checks.iter().filter(|c| c.passed).count();
        let non_compliant = checks
            .iter()
            .filter(|c| c.status == CheckStatus::NonCompliant)
            .count();
        let review_required = checks
            .iter()
            .filter(|c| c.status == CheckStatus::ReviewRequired)
            .count();

        let score = if total == 0 {
            100
        } else {
            (passed as f64 * 100.0 / total as f64).round() as u8
        };

        let summary_en = format!(
            "Passed {passed}/{total} checks. Non-compliant: {non_compliant}. Review-required: {review_required}."
        );
        let summary_ar = format!(
            "اجتاز {passed} من {total} فحصًا. غير متوافق: {non_compliant}. يتطلب مراجعة: {review_required}."
        );
        let (summary, summary_ar) = self.select_language(summary_en, summary_ar);

        let report_id = new_report_id();
        let timestamp = now_iso_millis();
        let audit_hash = report_hash(&report_id, &timestamp, &checks, &self.config.frameworks);

        ComplianceReport {
            report_id,
            timestamp,
            overall_status,
            frameworks: self.config.frameworks.clone(),
            checks,
            score,
            summary,
            summary_ar,
            audit_hash,
        }
    }

    fn degenerate_report(&self, err: &ComplianceError) -> ComplianceReport {
        let report_id = new_report_id();
        let timestamp = now_iso_millis();
        let summary_en = format!("compliance evaluation failed: {err}");
        let summary_ar = format!("فشل تقييم الامتثال: {err}");
        let (summary, summary_ar) = self.select_language(summary_en, summary_ar);
        let audit_hash = report_hash(&report_id, &timestamp, &[], &self.config.frameworks);

        ComplianceReport {
            report_id,
            timestamp,
            overall_status: CheckStatus::ReviewRequired,
            frameworks: self.config.frameworks.clone(),
            checks: Vec::new(),
            score: 0,
            summary,
            summary_ar,
            audit_hash,
        }
    }

    fn select_language(&self, en: String, ar: String) -> (String, String) {
        match self.config.language {
            Language::En => (en, String::new()),
            Language::Ar => (String::new(), ar),
            Language::Both => (en, ar),
        }
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(ComplianceConfig::default())
    }
}

fn checker_for(framework: Framework) -> Option<Box<dyn FrameworkChecker>> {
    match framework {
        Framework::Pdpl => Some(Box::new(PdplChecker::new())),
        Framework::UaeAiEthics => Some(Box::new(AiEthicsChecker::new())),
        Framework::Nesa => Some(Box::new(NesaChecker::new())),
        Framework::DubaiAiLaw => Some(Box::new(DubaiAiLawChecker::new())),
        // Accepted in configuration, no checker shipped yet
        Framework::Adgm => None,
    }
}

/// Hash pre-image for the report signature
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportPreImage<'a> {
    report_id: &'a str,
    timestamp: &'a str,
    checks: &'a [ComplianceCheck],
    frameworks: &'a [Framework],
}

fn report_hash(
    report_id: &str,
    timestamp: &str,
    checks: &[ComplianceCheck],
    frameworks: &[Framework],
) -> String {
    let pre_image = ReportPreImage {
        report_id,
        timestamp,
        checks,
        frameworks,
    };
    match canonical_json(&pre_image) {
        Ok(canonical) => sha256_hex(canonical.as_bytes()),
        Err(err) => {
            warn!(error = %err, "report hash serialisation failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditLevel;
    use serde_json::json;
    use warden_types::GENESIS_HASH;

    fn entry_for(decision: &Decision, input: &Facts) -> AuditEntry {
        AuditEntry::seal(
            decision.audit_id.clone(),
            "2026-03-01T10:00:00.000Z".into(),
            input.clone(),
            decision.clone(),
            GENESIS_HASH.into(),
        )
        .unwrap()
    }

    fn evaluate(config: ComplianceConfig, input: serde_json::Value) -> ComplianceReport {
        let facts = Facts::from_value(input);
        let decision = Decision::unmatched_review();
        let entry = entry_for(&decision, &facts);
        ComplianceEngine::new(config).evaluate(&facts, &decision, Some(&entry))
    }

    #[test]
    fn dubai_prohibition_drives_overall_status() {
        let config =
            ComplianceConfig::default().with_frameworks(vec![Framework::DubaiAiLaw]);
        let report = evaluate(config, json!({ "useCase": "deepfake_generation" }));

        let art3 = report
            .checks
            .iter()
            .find(|c| c.framework == Framework::DubaiAiLaw && c.article.contains("Art. 3"))
            .unwrap();
        assert!(!art3.passed);
        assert_eq!(art3.status, CheckStatus::NonCompliant);
        assert_eq!(report.overall_status, CheckStatus::NonCompliant);
    }

    #[test]
    fn overall_status_precedence_holds() {
        let report = evaluate(ComplianceConfig::default(), json!({}));
        let any_non_compliant = report
            .checks
            .iter()
            .any(|c| c.status == CheckStatus::NonCompliant);
        let any_review = report
            .checks
            .iter()
            .any(|c| c.status == CheckStatus::ReviewRequired);
        let expected = if any_non_compliant {
            CheckStatus::NonCompliant
        } else if any_review {
            CheckStatus::ReviewRequired
        } else {
            CheckStatus::Compliant
        };
        assert_eq!(report.overall_status, expected);
    }

    #[test]
    fn score_is_rounded_percentage_of_passed() {
        let report = evaluate(ComplianceConfig::default(), json!({}));
        let total = report.checks.len();
        let passed = report.checks.iter().filter(|c| c.passed).count();
        let expected = (passed as f64 * 100.0 / total as f64).round() as u8;
        assert_eq!(report.score, expected);
        assert!(report.score <= 100);
    }

    #[test]
    fn empty_framework_set_scores_one_hundred() {
        let config = ComplianceConfig::default().with_frameworks(vec![]);
        let report = evaluate(config, json!({}));
        assert_eq!(report.checks.len(), 0);
        assert_eq!(report.score, 100);
        assert_eq!(report.overall_status, CheckStatus::Compliant);
    }

    #[test]
    fn adgm_is_accepted_but_contributes_no_checks() {
        let config = ComplianceConfig::default().with_frameworks(vec![Framework::Adgm]);
        let report = evaluate(config, json!({}));
        assert!(report.checks.is_empty());
        assert_eq!(report.frameworks, vec![Framework::Adgm]);
    }

    #[test]
    fn checks_follow_configured_framework_order() {
        let config = ComplianceConfig::default()
            .with_frameworks(vec![Framework::Nesa, Framework::Pdpl]);
        let report = evaluate(config, json!({}));
        let first_pdpl = report
            .checks
            .iter()
            .position(|c| c.framework == Framework::Pdpl)
            .unwrap();
        let last_nesa = report
            .checks
            .iter()
            .rposition(|c| c.framework == Framework::Nesa)
            .unwrap();
        assert!(last_nesa < first_pdpl);
    }

    #[test]
    fn summaries_respect_the_language_setting() {
        let en_only = evaluate(
            ComplianceConfig::default().with_language(Language::En),
            json!({}),
        );
        assert!(en_only.summary.starts_with("Passed"));
        assert!(en_only.summary_ar.is_empty());

        let ar_only = evaluate(
            ComplianceConfig::default().with_language(Language::Ar),
            json!({}),
        );
        assert!(ar_only.summary.is_empty());
        assert!(ar_only.summary_ar.contains("اجتاز"));

        let both = evaluate(ComplianceConfig::default(), json!({}));
        assert!(!both.summary.is_empty());
        assert!(!both.summary_ar.is_empty());
    }

    #[test]
    fn report_carries_a_hash_over_its_contents() {
        let report = evaluate(ComplianceConfig::default(), json!({}));
        assert_eq!(report.audit_hash.len(), 64);

        let recomputed = report_hash(
            &report.report_id,
            &report.timestamp,
            &report.checks,
            &report.frameworks,
        );
        assert_eq!(report.audit_hash, recomputed);
    }

    #[test]
    fn quick_check_collects_only_non_compliant_items() {
        let engine = ComplianceEngine::default();
        let decision = Decision::unmatched_review();

        let clean = engine.quick_check(
            &Facts::from_value(json!({ "purpose": "billing", "humanReview": true })),
            &decision,
        );
        assert!(clean.passed);
        assert!(clean.issues.is_empty());

        let dirty = engine.quick_check(
            &Facts::from_value(json!({ "email": "user@example.ae" })),
            &decision,
        );
        assert!(!dirty.passed);
        assert!(dirty
            .issues
            .iter()
            .all(|c| c.status == CheckStatus::NonCompliant));
        // PDPL Art. 6 consent failure is among the issues
        assert!(dirty.issues.iter().any(|c| c.article == "Art. 6"));
    }

    #[test]
    fn basic_audit_level_shrinks_the_pdpl_family() {
        let full = evaluate(
            ComplianceConfig::default().with_frameworks(vec![Framework::Pdpl]),
            json!({}),
        );
        let basic = evaluate(
            ComplianceConfig::default()
                .with_frameworks(vec![Framework::Pdpl])
                .with_audit_level(AuditLevel::Basic),
            json!({}),
        );
        assert!(basic.checks.len() < full.checks.len());
    }

    #[test]
    fn sensitive_data_with_consent_scenario() {
        let config = ComplianceConfig::default().with_frameworks(vec![Framework::Pdpl]);
        let report = evaluate(
            config,
            json!({
                "healthRecord": "diabetes",
                "sensitiveDataConsent": true,
                "purpose": "care",
            }),
        );
        let art16 = report
            .checks
            .iter()
            .find(|c| c.article == "Art. 16")
            .unwrap();
        assert!(art16.passed);
    }
}
