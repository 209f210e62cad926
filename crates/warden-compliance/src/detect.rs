//! Pattern detectors shared by the framework checkers
//!
//! All detectors run over the lowercased canonical JSON of the input, so
//! matching is approximate by design: key names and values are scanned
//! alike, which preserves the observable behaviour the controls were
//! written against.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap());

/// UAE national identifier: 784-dddd-ddddddd-d
static EMIRATES_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"784-\d{4}-\d{7}-\d").unwrap());

/// UAE mobile number with +971 / 00971 / 0 prefix
static UAE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+971|00971|0)[\s-]?5[024568][\s-]?\d{3}[\s-]?\d{4}").unwrap()
});

/// Passport: one letter followed by 6 to 8 digits
static PASSPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]\d{6,8}\b").unwrap());

/// One category of personally identifying data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiKind {
    Email,
    EmiratesId,
    Phone,
    Passport,
}

impl PiiKind {
    pub fn label(&self) -> &'static str {
        match self {
            PiiKind::Email => "email address",
            PiiKind::EmiratesId => "Emirates ID",
            PiiKind::Phone => "UAE phone number",
            PiiKind::Passport => "passport number",
        }
    }
}

/// Distinct PII categories present in the text
pub fn detect_pii(text: &str) -> Vec<PiiKind> {
    let mut kinds = Vec::new();
    if EMAIL.is_match(text) {
        kinds.push(PiiKind::Email);
    }
    if EMIRATES_ID.is_match(text) {
        kinds.push(PiiKind::EmiratesId);
    }
    if UAE_PHONE.is_match(text) {
        kinds.push(PiiKind::Phone);
    }
    if PASSPORT.is_match(text) {
        kinds.push(PiiKind::Passport);
    }
    kinds
}

/// First token from the list found in the text, if any
pub fn first_match<'a>(text: &str, tokens: &[&'a str]) -> Option<&'a str> {
    tokens.iter().find(|token| text.contains(*token)).copied()
}

/// Whether any token from the list occurs in the text
pub fn contains_any(text: &str, tokens: &[&str]) -> bool {
    first_match(text, tokens).is_some()
}

/// Special-category data under data-protection law
pub const SENSITIVE_MARKERS: &[&str] = &[
    "health",
    "medical",
    "diagnosis",
    "biometric",
    "genetic",
    "religion",
    "religious",
    "ethnic",
    "criminal",
    "disability",
];

/// Credential-shaped tokens, including PEM headers
pub const CREDENTIAL_MARKERS: &[&str] = &[
    "api_key",
    "apikey",
    "password",
    "private_key",
    "privatekey",
    "secret",
    "token=",
    "begin rsa private key",
    "begin private key",
];

/// Uses prohibited outright by the Dubai AI Law control
pub const PROHIBITED_USE_MARKERS: &[&str] = &[
    "deepfake",
    "deep_fake",
    "social scoring",
    "social_scoring",
    "socialscoring",
    "mass surveillance",
    "mass_surveillance",
    "subliminal",
    "dark pattern",
    "exploit vulnerable",
];

/// High-risk application categories requiring registration and oversight
pub const HIGH_RISK_MARKERS: &[&str] = &[
    "biometric",
    "critical infrastructure",
    "critical_infrastructure",
    "recruitment",
    "hiring",
    "credit scoring",
    "credit_scoring",
    "creditscoring",
    "law enforcement",
    "law_enforcement",
    "medical diagnosis",
    "border control",
];

/// Demographic attributes that make bias review necessary
pub const DEMOGRAPHIC_MARKERS: &[&str] = &[
    "gender",
    "race",
    "ethnicity",
    "religion",
    "nationality",
    "age group",
    "age_group",
    "tribe",
];

/// Human-oversight indicators
pub const OVERSIGHT_MARKERS: &[&str] = &[
    "humanoversight",
    "human_oversight",
    "humaninloop",
    "human_in_loop",
    "humanintheloop",
    "human_in_the_loop",
    "humanreview",
    "human_review",
    "reviewedby",
    "reviewed_by",
];

/// AI disclosure indicators
pub const DISCLOSURE_MARKERS: &[&str] = &[
    "aidisclosure",
    "ai_disclosure",
    "disclosedai",
    "disclosed_ai",
    "aigenerated",
    "ai_generated",
    "transparencynotice",
    "transparency_notice",
];

/// AI system registration indicators
pub const REGISTRATION_MARKERS: &[&str] = &[
    "airegistrationid",
    "ai_registration_id",
    "conformityid",
    "conformity_id",
    "conformityassessment",
];

/// Data-governance programme indicators
pub const GOVERNANCE_MARKERS: &[&str] = &[
    "datagovernance",
    "data_governance",
    "datasteward",
    "data_steward",
    "governancepolicy",
    "governance_policy",
    "retentionpolicy",
    "retention_policy",
];

/// Data-subject rights indicators
pub const RIGHTS_MARKERS: &[&str] = &[
    "datasubjectrights",
    "data_subject_rights",
    "accessrequest",
    "access_request",
    "erasure",
    "rectification",
    "portability",
];

/// Breach-notification and DPO contact indicators
pub const BREACH_MARKERS: &[&str] = &[
    "breachnotification",
    "breach_notification",
    "dataprotectionofficer",
    "data_protection_officer",
    "dpo",
    "incidentresponse",
    "incident_response",
];

/// Encryption-at-rest or in-transit indicators
pub const ENCRYPTION_MARKERS: &[&str] = &["encrypted", "encryption", "aes", "kms", "tls"];

/// Role and authentication indicators
pub const AUTH_MARKERS: &[&str] = &[
    "role",
    "authenticated",
    "authorization",
    "authorisation",
    "permission",
    "accesslevel",
    "access_level",
];

/// Explicit consent for special-category data
pub const SENSITIVE_CONSENT_MARKERS: &[&str] = &[
    "sensitivedataconsent",
    "sensitive_data_consent",
    "explicitconsent",
    "explicit_consent",
];

/// Explainability indicators
pub const EXPLANATION_MARKERS: &[&str] = &["explanation", "explainable", "explainability"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_pii_kind() {
        assert_eq!(detect_pii("contact: user@example.ae"), vec![PiiKind::Email]);
        assert_eq!(detect_pii("id 784-1984-1234567-1"), vec![PiiKind::EmiratesId]);
        assert_eq!(detect_pii("call +971 50 123 4567"), vec![PiiKind::Phone]);
        assert_eq!(detect_pii("passport n1234567"), vec![PiiKind::Passport]);
    }

    #[test]
    fn phone_prefixes() {
        assert!(!detect_pii("0561234567").is_empty());
        assert!(!detect_pii("009715012345 67".replace(' ', "").as_str()).is_empty());
        assert!(detect_pii("12345").is_empty());
    }

    #[test]
    fn counts_distinct_kinds_once() {
        let kinds = detect_pii("a@b.ae and c@d.ae plus 784-1111-2222333-4");
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn clean_text_has_no_pii() {
        assert!(detect_pii("just a perfectly ordinary sentence").is_empty());
    }

    #[test]
    fn marker_matching_is_substring_based() {
        // Documented false positive: policy metadata trips the credential
        // marker because matching is substring over the serialised input
        assert!(contains_any("password_policy_version", CREDENTIAL_MARKERS));
        assert!(contains_any("{\"healthrecord\":\"x\"}", SENSITIVE_MARKERS));
        assert!(!contains_any("{}", SENSITIVE_MARKERS));
    }

    #[test]
    fn first_match_reports_the_token() {
        assert_eq!(
            first_match("uses deepfake generation", PROHIBITED_USE_MARKERS),
            Some("deepfake")
        );
    }
}
