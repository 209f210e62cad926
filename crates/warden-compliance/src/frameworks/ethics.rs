//! UAE AI Ethics Principles controls
//!
//! Six principles: inclusiveness, reliability, transparency, security,
//! accountability, and privacy. Privacy delegates to the PDPL checker and
//! passes only when every PDPL control passed.

use warden_types::{Action, CheckStatus, ComplianceCheck, Framework};

use crate::checker::{CheckContext, FrameworkChecker};
use crate::detect::{
    contains_any, CREDENTIAL_MARKERS, DEMOGRAPHIC_MARKERS, EXPLANATION_MARKERS, OVERSIGHT_MARKERS,
};
use crate::error::Result;
use crate::frameworks::pdpl::PdplChecker;

const RELIABILITY_THRESHOLD: f64 = 0.60;
const ACCOUNTABILITY_THRESHOLD: f64 = 0.75;

pub struct AiEthicsChecker;

impl AiEthicsChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiEthicsChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkChecker for AiEthicsChecker {
    fn framework(&self) -> Framework {
        Framework::UaeAiEthics
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<ComplianceCheck>> {
        Ok(vec![
            inclusiveness(ctx),
            reliability(ctx),
            transparency(ctx),
            security(ctx),
            accountability(ctx),
            privacy(ctx)?,
        ])
    }
}

fn inclusiveness(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let biased = contains_any(&ctx.input_text, DEMOGRAPHIC_MARKERS);
    let status = if biased {
        CheckStatus::ReviewRequired
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Inclusiveness",
        status,
        "Decisions must not discriminate on demographic attributes",
        "يجب ألا تميّز القرارات على أساس الخصائص الديموغرافية",
        if biased {
            "Bias-sensitive demographic attributes appear in the input".to_string()
        } else {
            "No bias-sensitive demographic attributes detected".to_string()
        },
    );
    if biased {
        check.with_remediation(
            "Review the decision for disparate impact across the flagged attributes",
            "راجع القرار للتحقق من عدم وجود أثر تمييزي عبر الخصائص المرصودة",
        )
    } else {
        check
    }
}

fn reliability(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let confidence = ctx.confidence();
    let reliable = confidence >= RELIABILITY_THRESHOLD;
    let status = if reliable {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Reliability",
        status,
        "Automated decisions must meet a minimum confidence threshold",
        "يجب أن تحقق القرارات الآلية حدًا أدنى من الثقة",
        format!("Decision confidence {confidence:.2} against threshold {RELIABILITY_THRESHOLD:.2}"),
    );
    if reliable {
        check
    } else {
        check.with_remediation(
            "Route low-confidence decisions to a human reviewer",
            "حوّل القرارات منخفضة الثقة إلى مراجع بشري",
        )
    }
}

fn transparency(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let has_audit_id = !ctx.decision.audit_id.is_empty();
    let explained = contains_any(&ctx.input_text, EXPLANATION_MARKERS)
        || ctx.decision.reason.len() > 10;
    let transparent = has_audit_id && explained;
    let status = if transparent {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Transparency",
        status,
        "Every decision must be traceable and carry an explanation",
        "يجب أن يكون كل قرار قابلًا للتتبع ومصحوبًا بتفسير",
        format!(
            "audit id present: {has_audit_id}, explanation present: {explained}"
        ),
    );
    if transparent {
        check
    } else {
        check.with_remediation(
            "Attach an audit identifier and a substantive reason to the decision",
            "أرفق معرّف تدقيق وسببًا وافيًا بالقرار",
        )
    }
}

fn security(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let leaked = contains_any(&ctx.input_text, CREDENTIAL_MARKERS);
    let status = if leaked {
        CheckStatus::NonCompliant
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Security",
        status,
        "Credentials and key material must never enter the decision input",
        "يجب ألا تدخل بيانات الاعتماد أو مواد المفاتيح في مدخلات القرار",
        if leaked {
            "Credential-like tokens detected in the input".to_string()
        } else {
            "No credential-like tokens detected".to_string()
        },
    );
    if leaked {
        check.with_remediation(
            "Strip secrets from the input and rotate any exposed credentials",
            "أزل الأسرار من المدخلات وبدّل أي بيانات اعتماد مكشوفة",
        )
    } else {
        check
    }
}

fn accountability(ctx: &CheckContext<'_>) -> ComplianceCheck {
    let needs_oversight = ctx.decision.result != Action::Approved
        || ctx.confidence() < ACCOUNTABILITY_THRESHOLD;
    let overseen = contains_any(&ctx.input_text, OVERSIGHT_MARKERS);
    let accountable = !needs_oversight || overseen;
    let status = if accountable {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Accountability",
        status,
        "Non-approved or low-confidence decisions require human oversight",
        "تتطلب القرارات غير المعتمدة أو منخفضة الثقة إشرافًا بشريًا",
        format!(
            "oversight required: {needs_oversight}, oversight marker present: {overseen}"
        ),
    );
    if accountable {
        check
    } else {
        check.with_remediation(
            "Assign a human owner for this class of decision",
            "عيّن مسؤولًا بشريًا عن هذه الفئة من القرارات",
        )
    }
}

fn privacy(ctx: &CheckContext<'_>) -> Result<ComplianceCheck> {
    let pdpl_checks = PdplChecker::new().check(ctx)?;
    let failed: Vec<&ComplianceCheck> = pdpl_checks.iter().filter(|c| !c.passed).collect();
    let status = if failed.is_empty() {
        CheckStatus::Compliant
    } else if failed
        .iter()
        .any(|c| c.status == CheckStatus::NonCompliant)
    {
        CheckStatus::NonCompliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::UaeAiEthics,
        "Privacy",
        status,
        "Personal data handling must satisfy every PDPL control",
        "يجب أن تستوفي معالجة البيانات الشخصية جميع ضوابط قانون حماية البيانات",
        format!(
            "{} of {} PDPL controls passed",
            pdpl_checks.len() - failed.len(),
            pdpl_checks.len()
        ),
    );
    Ok(if failed.is_empty() {
        check
    } else {
        check.with_remediation(
            "Resolve the failing PDPL controls listed in this report",
            "عالج ضوابط حماية البيانات غير المستوفاة الواردة في هذا التقرير",
        )
    })
}
