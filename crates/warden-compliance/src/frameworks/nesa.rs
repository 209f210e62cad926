//! NESA (UAE national cyber security) controls
//!
//! Five controls over the sealed audit entry and the decision: audit
//! integrity, incident classification, data classification, access
//! control, and cryptography.

use warden_types::hash::is_well_formed_hash;
use warden_types::{Action, CheckStatus, ComplianceCheck, Framework};

use crate::checker::{CheckContext, FrameworkChecker};
use crate::detect::{
    contains_any, detect_pii, AUTH_MARKERS, CREDENTIAL_MARKERS, ENCRYPTION_MARKERS,
};
use crate::error::Result;

/// Derived incident severity for IR-02
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncidentLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl IncidentLevel {
    fn derive(result: Action, score: u8) -> Self {
        if result == Action::Rejected && score <= 20 {
            IncidentLevel::Critical
        } else if result == Action::Rejected || score < 40 {
            IncidentLevel::High
        } else if result == Action::Review || score < 70 {
            IncidentLevel::Medium
        } else {
            IncidentLevel::Low
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IncidentLevel::Critical => "CRITICAL",
            IncidentLevel::High => "HIGH",
            IncidentLevel::Medium => "MEDIUM",
            IncidentLevel::Low => "LOW",
        }
    }
}

/// Derived data classification for DS-01 and CR-01
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataClass {
    Secret,
    Confidential,
    Internal,
    Public,
}

impl DataClass {
    fn derive(ctx: &CheckContext<'_>) -> Self {
        if contains_any(&ctx.input_text, CREDENTIAL_MARKERS) {
            DataClass::Secret
        } else if !detect_pii(&ctx.input_text).is_empty() {
            DataClass::Confidential
        } else if !ctx.input.is_empty() {
            DataClass::Internal
        } else {
            DataClass::Public
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DataClass::Secret => "SECRET",
            DataClass::Confidential => "CONFIDENTIAL",
            DataClass::Internal => "INTERNAL",
            DataClass::Public => "PUBLIC",
        }
    }

    fn requires_encryption(&self) -> bool {
        matches!(self, DataClass::Secret | DataClass::Confidential)
    }
}

pub struct NesaChecker;

impl NesaChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NesaChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkChecker for NesaChecker {
    fn framework(&self) -> Framework {
        Framework::Nesa
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<ComplianceCheck>> {
        let class = DataClass::derive(ctx);
        Ok(vec![
            audit_integrity(ctx),
            incident_classification(ctx),
            data_classification(class),
            access_control(ctx),
            cryptography(ctx, class),
        ])
    }
}

fn audit_integrity(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let intact = ctx
        .entry
        .map(|entry| is_well_formed_hash(&entry.hash) && is_well_formed_hash(&entry.previous_hash))
        .unwrap_or(false);
    let status = if intact {
        CheckStatus::Compliant
    } else {
        CheckStatus::NonCompliant
    };
    let check = ComplianceCheck::new(
        Framework::Nesa,
        "AU-01",
        status,
        "Decisions must be recorded in a tamper-evident audit chain",
        "يجب تسجيل القرارات في سلسلة تدقيق مقاومة للتلاعب",
        match ctx.entry {
            Some(_) if intact => "Entry carries well-formed chain hashes".to_string(),
            Some(_) => "Entry hash or previous hash is malformed".to_string(),
            None => "No audit entry available for this decision".to_string(),
        },
    );
    if intact {
        check
    } else {
        check.with_remediation(
            "Persist the decision through the hash-chained audit journal",
            "سجّل القرار عبر سجل التدقيق المتسلسل بالتجزئة",
        )
    }
}

fn incident_classification(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let level = IncidentLevel::derive(ctx.decision.result, ctx.decision.score);
    let escalate = matches!(level, IncidentLevel::Critical | IncidentLevel::High);
    let status = if escalate {
        CheckStatus::ReviewRequired
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::Nesa,
        "IR-02",
        status,
        "Decisions must be classified for incident response",
        "يجب تصنيف القرارات لأغراض الاستجابة للحوادث",
        format!("Derived incident level: {}", level.label()),
    );
    if escalate {
        check.with_remediation(
            "Open an incident-response ticket for this decision",
            "افتح بلاغ استجابة للحوادث لهذا القرار",
        )
    } else {
        check
    }
}

fn data_classification(class: DataClass) -> ComplianceCheck {
    ComplianceCheck::new(
        Framework::Nesa,
        "DS-01",
        CheckStatus::Compliant,
        "Input data must carry a classification level",
        "يجب أن تحمل البيانات المدخلة مستوى تصنيف",
        format!("Derived data class: {}", class.label()),
    )
}

fn access_control(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let present = contains_any(&ctx.input_text, AUTH_MARKERS);
    let status = if present {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::Nesa,
        "AC-01",
        status,
        "Requests must carry a role or authentication context",
        "يجب أن تحمل الطلبات سياق دور أو مصادقة",
        if present {
            "Role or authentication marker found".to_string()
        } else {
            "No role or authentication marker found".to_string()
        },
    );
    if present {
        check
    } else {
        check.with_remediation(
            "Attach the requesting principal's role or authentication context",
            "أرفق دور الجهة الطالبة أو سياق مصادقتها بالطلب",
        )
    }
}

fn cryptography(ctx: &CheckContext<'_>, class: DataClass) -> ComplianceCheck {
    if !class.requires_encryption() {
        return ComplianceCheck::new(
            Framework::Nesa,
            "CR-01",
            CheckStatus::Compliant,
            "Confidential and secret data must be encrypted",
            "يجب تشفير البيانات السرية وذات الطابع الخاص",
            format!("Data class {} does not require encryption", class.label()),
        );
    }
    let encrypted = contains_any(&ctx.input_text, ENCRYPTION_MARKERS);
    let status = if encrypted {
        CheckStatus::Compliant
    } else {
        CheckStatus::NonCompliant
    };
    let check = ComplianceCheck::new(
        Framework::Nesa,
        "CR-01",
        status,
        "Confidential and secret data must be encrypted",
        "يجب تشفير البيانات السرية وذات الطابع الخاص",
        format!(
            "Data class {} with encryption marker present: {encrypted}",
            class.label()
        ),
    );
    if encrypted {
        check
    } else {
        check.with_remediation(
            "Encrypt this data at rest and in transit before processing",
            "شفّر هذه البيانات أثناء التخزين والنقل قبل المعالجة",
        )
    }
}
