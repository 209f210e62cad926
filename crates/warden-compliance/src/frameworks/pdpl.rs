//! UAE Personal Data Protection Law controls
//!
//! Seven controls over the input tree: data-subject rights, explicit
//! purpose, consent, minimisation, residency, special-category data, and
//! breach readiness. At the basic audit level the two low-severity
//! controls (Art. 3 and Art. 18) are omitted.

use warden_types::{CheckStatus, ComplianceCheck, Framework};

use crate::checker::{CheckContext, FrameworkChecker};
use crate::config::{AuditLevel, DataResidency};
use crate::detect::{
    contains_any, detect_pii, BREACH_MARKERS, RIGHTS_MARKERS, SENSITIVE_CONSENT_MARKERS,
    SENSITIVE_MARKERS,
};
use crate::error::Result;

pub struct PdplChecker;

impl PdplChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdplChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkChecker for PdplChecker {
    fn framework(&self) -> Framework {
        Framework::Pdpl
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<ComplianceCheck>> {
        let text = &ctx.input_text;
        let pii = detect_pii(text);
        let mut checks = Vec::new();

        if ctx.config.audit_level == AuditLevel::Full {
            checks.push(data_subject_rights(text));
        }
        checks.push(explicit_purpose(ctx));
        checks.push(consent(text, !pii.is_empty()));
        checks.push(minimisation(pii.len()));
        checks.push(residency(ctx));
        checks.push(sensitive_data(text));
        if ctx.config.audit_level == AuditLevel::Full {
            checks.push(breach_readiness(text));
        }

        Ok(checks)
    }
}

fn data_subject_rights(text: &str) -> ComplianceCheck {
    let present = contains_any(text, RIGHTS_MARKERS);
    let status = if present {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 3",
        status,
        "Data-subject rights must be supported and signalled for processing operations",
        "يجب دعم حقوق أصحاب البيانات والإشارة إليها في عمليات المعالجة",
        if present {
            "Data-subject rights markers found in the input".to_string()
        } else {
            "No data-subject rights markers found".to_string()
        },
    );
    if present {
        check
    } else {
        check.with_remediation(
            "Record how access, rectification, erasure, and portability requests are honoured",
            "وثّق كيفية تلبية طلبات الوصول والتصحيح والمحو ونقل البيانات",
        )
    }
}

fn explicit_purpose(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let present = ctx
        .input
        .has_key_containing(&["purpose", "action", "usecase", "use_case"]);
    let status = if present {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 4",
        status,
        "Personal data may only be processed for an explicit, declared purpose",
        "لا يجوز معالجة البيانات الشخصية إلا لغرض صريح ومعلن",
        if present {
            "A purpose key is declared in the input".to_string()
        } else {
            "No purpose, action, or useCase key declared".to_string()
        },
    );
    if present {
        check
    } else {
        check.with_remediation(
            "Add a purpose or useCase field stating why the data is processed",
            "أضف حقل الغرض أو حالة الاستخدام لبيان سبب معالجة البيانات",
        )
    }
}

fn consent(text: &str, has_pii: bool) -> ComplianceCheck {
    if !has_pii {
        return ComplianceCheck::new(
            Framework::Pdpl,
            "Art. 6",
            CheckStatus::Compliant,
            "Processing personal data requires the data subject's consent",
            "تتطلب معالجة البيانات الشخصية موافقة صاحب البيانات",
            "No personal data detected in the input",
        );
    }
    let consented = text.contains("consent");
    let status = if consented {
        CheckStatus::Compliant
    } else {
        CheckStatus::NonCompliant
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 6",
        status,
        "Processing personal data requires the data subject's consent",
        "تتطلب معالجة البيانات الشخصية موافقة صاحب البيانات",
        if consented {
            "Personal data present with a consent marker".to_string()
        } else {
            "Personal data present without any consent marker".to_string()
        },
    );
    if consented {
        check
    } else {
        check.with_remediation(
            "Capture and record the data subject's consent before processing",
            "احصل على موافقة صاحب البيانات وسجّلها قبل المعالجة",
        )
    }
}

fn minimisation(pii_kinds: usize) -> ComplianceCheck {
    let excessive = pii_kinds >= 3;
    let status = if excessive {
        CheckStatus::ReviewRequired
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 10",
        status,
        "Collection must be limited to what the purpose strictly requires",
        "يجب أن يقتصر جمع البيانات على ما يقتضيه الغرض بدقة",
        format!("{pii_kinds} distinct personal-data categories detected"),
    );
    if excessive {
        check.with_remediation(
            "Reduce the categories of personal data collected for this operation",
            "قلّل فئات البيانات الشخصية التي تُجمع لهذه العملية",
        )
    } else {
        check
    }
}

fn residency(ctx: &CheckContext<'_>) -> ComplianceCheck {
    if ctx.config.data_residency != DataResidency::Uae {
        return ComplianceCheck::new(
            Framework::Pdpl,
            "Art. 14",
            CheckStatus::Compliant,
            "Cross-border transfer of personal data requires an adequate destination",
            "يتطلب نقل البيانات الشخصية عبر الحدود وجهة ذات حماية كافية",
            "No residency constraint configured",
        );
    }

    let declared = ctx
        .input
        .value_for_key_containing("residency")
        .or_else(|| ctx.input.value_for_key_containing("region"))
        .or_else(|| ctx.input.value_for_key_containing("location"))
        .and_then(|value| value.as_str())
        .map(|s| s.to_lowercase());

    let outside = matches!(
        declared.as_deref(),
        Some(region) if !(region.contains("uae")
            || region.contains("united arab emirates")
            || region.contains("dubai")
            || region.contains("abu dhabi")
            || region == "ae")
    );

    let status = if outside {
        CheckStatus::NonCompliant
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 14",
        status,
        "UAE residency is required for this deployment's personal data",
        "يُشترط بقاء البيانات الشخصية داخل دولة الإمارات لهذا النشر",
        match declared {
            Some(region) => format!("Input declares data residency '{region}'"),
            None => "No residency declaration in the input".to_string(),
        },
    );
    if outside {
        check.with_remediation(
            "Move storage and processing for this data into the UAE",
            "انقل تخزين هذه البيانات ومعالجتها إلى داخل دولة الإمارات",
        )
    } else {
        check
    }
}

fn sensitive_data(text: &str) -> ComplianceCheck {
    let sensitive = contains_any(text, SENSITIVE_MARKERS);
    if !sensitive {
        return ComplianceCheck::new(
            Framework::Pdpl,
            "Art. 16",
            CheckStatus::Compliant,
            "Special-category data requires explicit separate consent",
            "تتطلب البيانات ذات الطبيعة الحساسة موافقة صريحة منفصلة",
            "No special-category data detected",
        );
    }
    let consented = contains_any(text, SENSITIVE_CONSENT_MARKERS);
    let status = if consented {
        CheckStatus::Compliant
    } else {
        CheckStatus::NonCompliant
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 16",
        status,
        "Special-category data requires explicit separate consent",
        "تتطلب البيانات ذات الطبيعة الحساسة موافقة صريحة منفصلة",
        if consented {
            "Special-category data present with explicit separate consent".to_string()
        } else {
            "Special-category data present without explicit separate consent".to_string()
        },
    );
    if consented {
        check
    } else {
        check.with_remediation(
            "Obtain explicit separate consent before processing special-category data",
            "احصل على موافقة صريحة منفصلة قبل معالجة البيانات الحساسة",
        )
    }
}

fn breach_readiness(text: &str) -> ComplianceCheck {
    let present = contains_any(text, BREACH_MARKERS);
    let status = if present {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::Pdpl,
        "Art. 18",
        status,
        "Breach notification and a data protection officer contact must be in place",
        "يجب توفر آلية للإبلاغ عن الاختراقات وجهة اتصال لمسؤول حماية البيانات",
        if present {
            "Breach-notification or DPO marker found".to_string()
        } else {
            "No breach-notification or DPO marker found".to_string()
        },
    );
    if present {
        check
    } else {
        check.with_remediation(
            "Register a DPO contact and a breach-notification procedure",
            "سجّل جهة اتصال لمسؤول حماية البيانات وإجراءً للإبلاغ عن الاختراقات",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComplianceConfig;
    use serde_json::json;
    use warden_types::{Decision, Facts};

    fn run(input: serde_json::Value, config: &ComplianceConfig) -> Vec<ComplianceCheck> {
        let facts = Facts::from_value(input);
        let decision = Decision::unmatched_review();
        let ctx = CheckContext::new(&facts, &decision, None, config);
        PdplChecker::new().check(&ctx).unwrap()
    }

    fn article<'a>(checks: &'a [ComplianceCheck], article: &str) -> &'a ComplianceCheck {
        checks
            .iter()
            .find(|c| c.article == article)
            .unwrap_or_else(|| panic!("no check for {article}"))
    }

    #[test]
    fn full_level_runs_seven_checks() {
        let checks = run(json!({}), &ComplianceConfig::default());
        assert_eq!(checks.len(), 7);
    }

    #[test]
    fn basic_level_omits_low_severity_controls() {
        let config = ComplianceConfig::default().with_audit_level(AuditLevel::Basic);
        let checks = run(json!({}), &config);
        assert_eq!(checks.len(), 5);
        assert!(checks.iter().all(|c| c.article != "Art. 3"));
        assert!(checks.iter().all(|c| c.article != "Art. 18"));
    }

    #[test]
    fn consent_fails_when_pii_present_without_marker() {
        let checks = run(
            json!({ "email": "user@example.ae" }),
            &ComplianceConfig::default(),
        );
        let check = article(&checks, "Art. 6");
        assert_eq!(check.status, CheckStatus::NonCompliant);
        assert!(check.remediation.is_some());
        assert!(check.remediation_ar.is_some());
    }

    #[test]
    fn consent_passes_with_marker_or_without_pii() {
        let with_marker = run(
            json!({ "email": "user@example.ae", "consentGiven": true }),
            &ComplianceConfig::default(),
        );
        assert!(article(&with_marker, "Art. 6").passed);

        let no_pii = run(json!({ "amount": 5 }), &ComplianceConfig::default());
        assert!(article(&no_pii, "Art. 6").passed);
    }

    #[test]
    fn minimisation_flags_three_or_more_categories() {
        let checks = run(
            json!({
                "email": "user@example.ae",
                "eid": "784-1984-1234567-1",
                "phone": "+971501234567",
            }),
            &ComplianceConfig::default(),
        );
        assert_eq!(article(&checks, "Art. 10").status, CheckStatus::ReviewRequired);
    }

    #[test]
    fn residency_enforced_only_when_configured() {
        let offshore = json!({ "dataResidency": "eu-west-1" });
        let relaxed = run(offshore.clone(), &ComplianceConfig::default());
        assert!(article(&relaxed, "Art. 14").passed);

        let strict = ComplianceConfig::default().with_uae_residency();
        let enforced = run(offshore, &strict);
        assert_eq!(article(&enforced, "Art. 14").status, CheckStatus::NonCompliant);

        let local = run(json!({ "dataResidency": "UAE-North" }), &strict);
        assert!(article(&local, "Art. 14").passed);
    }

    #[test]
    fn sensitive_data_with_separate_consent_passes() {
        let checks = run(
            json!({
                "healthRecord": "diabetes",
                "sensitiveDataConsent": true,
                "purpose": "care",
            }),
            &ComplianceConfig::default(),
        );
        let check = article(&checks, "Art. 16");
        assert!(check.passed);
    }

    #[test]
    fn sensitive_data_without_separate_consent_fails() {
        let checks = run(
            json!({ "healthRecord": "diabetes", "consent": true }),
            &ComplianceConfig::default(),
        );
        // A generic consent marker is not the explicit separate consent
        assert_eq!(article(&checks, "Art. 16").status, CheckStatus::NonCompliant);
    }

    #[test]
    fn purpose_key_satisfies_article_four() {
        let with = run(json!({ "useCase": "kyc" }), &ComplianceConfig::default());
        assert!(article(&with, "Art. 4").passed);

        let without = run(json!({ "amount": 3 }), &ComplianceConfig::default());
        assert_eq!(article(&without, "Art. 4").status, CheckStatus::ReviewRequired);
    }
}
