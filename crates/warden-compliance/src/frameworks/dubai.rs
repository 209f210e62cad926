//! Dubai AI Law controls
//!
//! Five articles: prohibited uses, registration of high-risk systems, AI
//! disclosure, human oversight for high-risk use, and data governance.

use warden_types::{CheckStatus, ComplianceCheck, Framework};

use crate::checker::{CheckContext, FrameworkChecker};
use crate::detect::{
    contains_any, first_match, DISCLOSURE_MARKERS, GOVERNANCE_MARKERS, HIGH_RISK_MARKERS,
    OVERSIGHT_MARKERS, PROHIBITED_USE_MARKERS, REGISTRATION_MARKERS,
};
use crate::error::Result;

pub struct DubaiAiLawChecker;

impl DubaiAiLawChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DubaiAiLawChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkChecker for DubaiAiLawChecker {
    fn framework(&self) -> Framework {
        Framework::DubaiAiLaw
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<ComplianceCheck>> {
        let text = &ctx.input_text;
        let high_risk = first_match(text, HIGH_RISK_MARKERS);
        Ok(vec![
            prohibited_uses(text),
            registration(text, high_risk),
            disclosure(text),
            human_oversight(text, high_risk),
            data_governance(text),
        ])
    }
}

fn prohibited_uses(text: &str) -> ComplianceCheck {
    let matched = first_match(text, PROHIBITED_USE_MARKERS);
    let status = if matched.is_some() {
        CheckStatus::NonCompliant
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::DubaiAiLaw,
        "Art. 3",
        status,
        "Prohibited AI uses must not be requested or performed",
        "يُحظر طلب أو تنفيذ استخدامات الذكاء الاصطناعي المحظورة",
        match matched {
            Some(token) => format!("Prohibited-use token detected: '{token}'"),
            None => "No prohibited-use tokens detected".to_string(),
        },
    );
    if matched.is_some() {
        check.with_remediation(
            "Refuse this use case; it is prohibited outright",
            "ارفض حالة الاستخدام هذه فهي محظورة قطعًا",
        )
    } else {
        check
    }
}

fn registration(text: &str, high_risk: Option<&str>) -> ComplianceCheck {
    let registered = contains_any(text, REGISTRATION_MARKERS);
    let unregistered_high_risk = high_risk.is_some() && !registered;
    let status = if unregistered_high_risk {
        CheckStatus::ReviewRequired
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::DubaiAiLaw,
        "Art. 5",
        status,
        "High-risk AI systems must be registered with the competent authority",
        "يجب تسجيل أنظمة الذكاء الاصطناعي عالية المخاطر لدى الجهة المختصة",
        match high_risk {
            Some(token) if !registered => {
                format!("High-risk category '{token}' without a registration identifier")
            }
            Some(token) => format!("High-risk category '{token}' with registration identifier"),
            None => "No high-risk category detected".to_string(),
        },
    );
    if unregistered_high_risk {
        check.with_remediation(
            "Provide the system's aiRegistrationId or conformity assessment identifier",
            "قدّم معرّف تسجيل النظام أو معرّف تقييم المطابقة",
        )
    } else {
        check
    }
}

fn disclosure(text: &str) -> ComplianceCheck {
    let disclosed = contains_any(text, DISCLOSURE_MARKERS);
    let status = if disclosed {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::DubaiAiLaw,
        "Art. 8",
        status,
        "Users must be told when they interact with an AI system",
        "يجب إعلام المستخدمين عند تفاعلهم مع نظام ذكاء اصطناعي",
        if disclosed {
            "AI-disclosure marker present".to_string()
        } else {
            "No AI-disclosure marker present".to_string()
        },
    );
    if disclosed {
        check
    } else {
        check.with_remediation(
            "Set an aiDisclosure flag confirming users are informed",
            "فعّل مؤشر الإفصاح عن الذكاء الاصطناعي لتأكيد إعلام المستخدمين",
        )
    }
}

fn human_oversight(text: &str, high_risk: Option<&str>) -> ComplianceCheck {
    let overseen = contains_any(text, OVERSIGHT_MARKERS);
    let unsupervised_high_risk = high_risk.is_some() && !overseen;
    let status = if unsupervised_high_risk {
        CheckStatus::NonCompliant
    } else {
        CheckStatus::Compliant
    };
    let check = ComplianceCheck::new(
        Framework::DubaiAiLaw,
        "Art. 10",
        status,
        "High-risk AI decisions require a human in the loop",
        "تتطلب قرارات الذكاء الاصطناعي عالية المخاطر وجود إنسان في الحلقة",
        match high_risk {
            Some(token) if !overseen => {
                format!("High-risk category '{token}' without a human-in-the-loop marker")
            }
            Some(token) => format!("High-risk category '{token}' with human oversight"),
            None => "No high-risk category detected".to_string(),
        },
    );
    if unsupervised_high_risk {
        check.with_remediation(
            "Route this decision through a human reviewer before it takes effect",
            "مرّر هذا القرار عبر مراجع بشري قبل نفاذه",
        )
    } else {
        check
    }
}

fn data_governance(text: &str) -> ComplianceCheck {
    let governed = contains_any(text, GOVERNANCE_MARKERS);
    let status = if governed {
        CheckStatus::Compliant
    } else {
        CheckStatus::ReviewRequired
    };
    let check = ComplianceCheck::new(
        Framework::DubaiAiLaw,
        "Art. 12",
        status,
        "Processing must reference a data-governance programme",
        "يجب أن تستند المعالجة إلى برنامج لحوكمة البيانات",
        if governed {
            "Data-governance reference present".to_string()
        } else {
            "No data-governance reference present".to_string()
        },
    );
    if governed {
        check
    } else {
        check.with_remediation(
            "Link the applicable data-governance or retention policy",
            "اربط العملية بسياسة حوكمة البيانات أو سياسة الاحتفاظ المعمول بها",
        )
    }
}
