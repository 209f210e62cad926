//! One link of the audit hash chain

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_json;
use crate::compliance::ComplianceReport;
use crate::decision::{Decision, Rule};
use crate::error::Result;
use crate::facts::Facts;
use crate::hash::chain_hash;

/// A persisted decision plus chain metadata
///
/// Serde field order matches the journal line format exactly:
/// `id, timestamp, input, output, rule, previousHash, hash`. The optional
/// `compliance` report is attached after the entry is hashed and written,
/// so it is excluded from the hash pre-image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: String,
    pub input: Facts,
    pub output: Decision,
    pub rule: Option<Rule>,
    pub previous_hash: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceReport>,
}

/// Hash pre-image: the entry without its `hash` field
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreImage<'a> {
    id: &'a str,
    timestamp: &'a str,
    input: &'a Facts,
    output: &'a Decision,
    rule: &'a Option<Rule>,
    previous_hash: &'a str,
}

impl AuditEntry {
    /// Build and seal an entry: canonicalise the pre-image and chain-hash it
    pub fn seal(
        id: String,
        timestamp: String,
        input: Facts,
        output: Decision,
        previous_hash: String,
    ) -> Result<Self> {
        let rule = output.matched_rule.clone();
        let pre_image = PreImage {
            id: &id,
            timestamp: &timestamp,
            input: &input,
            output: &output,
            rule: &rule,
            previous_hash: &previous_hash,
        };
        let canonical = canonical_json(&pre_image)?;
        let hash = chain_hash(&previous_hash, &canonical);
        Ok(Self {
            id,
            timestamp,
            input,
            output,
            rule,
            previous_hash,
            hash,
            compliance: None,
        })
    }

    /// Recompute this entry's hash from its own fields
    pub fn recompute_hash(&self) -> Result<String> {
        let pre_image = PreImage {
            id: &self.id,
            timestamp: &self.timestamp,
            input: &self.input,
            output: &self.output,
            rule: &self.rule,
            previous_hash: &self.previous_hash,
        };
        let canonical = canonical_json(&pre_image)?;
        Ok(chain_hash(&self.previous_hash, &canonical))
    }

    /// Whether the stored hash matches the recomputed one
    pub fn hash_is_valid(&self) -> bool {
        self.recompute_hash()
            .map(|computed| computed == self.hash)
            .unwrap_or(false)
    }
}
