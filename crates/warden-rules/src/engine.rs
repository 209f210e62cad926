//! Priority-ordered rule evaluation

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use warden_expr::Predicate;
use warden_types::{Decision, Facts, Rule};

use crate::conflict::{detect, RuleConflict};
use crate::error::{Result, RuleError};

/// A rule paired with its compiled predicate
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    predicate: Predicate,
}

/// Evaluates facts against a compiled, priority-ordered rule set
///
/// `evaluate` and `detect_conflicts` take a snapshot of the current set
/// and may run concurrently from any number of threads; `load_rules` and
/// `add_rule` swap the whole set atomically.
pub struct RuleEngine {
    rules: RwLock<Arc<Vec<CompiledRule>>>,
}

impl RuleEngine {
    /// Create an engine with no rules loaded
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create an engine and load the given rules
    pub fn with_rules(rules: Vec<Rule>) -> Result<Self> {
        let engine = Self::new();
        engine.load_rules(rules)?;
        Ok(engine)
    }

    /// Validate, sort, and install a rule set, replacing any previous one
    ///
    /// Every condition is compiled up front; the first failure rejects the
    /// whole load and the previous set stays installed.
    pub fn load_rules(&self, rules: Vec<Rule>) -> Result<()> {
        let compiled = Self::compile_set(rules)?;
        *self.rules.write() = Arc::new(compiled);
        Ok(())
    }

    /// Append one rule and re-sort the set
    pub fn add_rule(&self, rule: Rule) -> Result<()> {
        let snapshot = self.snapshot();
        if snapshot.iter().any(|c| c.rule.id == rule.id) {
            return Err(RuleError::DuplicateId(rule.id));
        }
        let mut rules: Vec<Rule> = snapshot.iter().map(|c| c.rule.clone()).collect();
        rules.push(rule);
        self.load_rules(rules)
    }

    /// Evaluate facts in priority order; first matching rule wins
    ///
    /// A predicate that fails internally evaluates to false and the rule
    /// is skipped. When nothing matches, the default REVIEW decision is
    /// returned with no matched rule.
    pub fn evaluate(&self, facts: &Facts) -> Decision {
        let snapshot = self.snapshot();
        for compiled in snapshot.iter() {
            if compiled.predicate.eval(facts) {
                debug!(rule = %compiled.rule.id, action = %compiled.rule.action, "rule matched");
                return Decision::from_rule(&compiled.rule);
            }
        }
        debug!("no rule matched, defaulting to review");
        Decision::unmatched_review()
    }

    /// Pairwise conflict scan over the loaded set
    ///
    /// O(n²) over rule count, which is fine at the hundreds scale this
    /// engine targets.
    pub fn detect_conflicts(&self) -> Vec<RuleConflict> {
        let snapshot = self.snapshot();
        let rules: Vec<&Rule> = snapshot.iter().map(|c| &c.rule).collect();
        detect(&rules)
    }

    /// Snapshot of the loaded rules in evaluation order
    pub fn rules(&self) -> Vec<Rule> {
        self.snapshot().iter().map(|c| c.rule.clone()).collect()
    }

    /// Number of loaded rules
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether no rules are loaded
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn snapshot(&self) -> Arc<Vec<CompiledRule>> {
        self.rules.read().clone()
    }

    fn compile_set(rules: Vec<Rule>) -> Result<Vec<CompiledRule>> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            if compiled.iter().any(|c: &CompiledRule| c.rule.id == rule.id) {
                return Err(RuleError::DuplicateId(rule.id));
            }
            if let Some(score) = rule.score {
                if score > 100 {
                    return Err(RuleError::ScoreOutOfRange {
                        rule_id: rule.id,
                        score,
                    });
                }
            }
            let predicate =
                warden_expr::compile(&rule.condition).map_err(|source| {
                    RuleError::InvalidCondition {
                        rule_id: rule.id.clone(),
                        source,
                    }
                })?;
            compiled.push(CompiledRule { rule, predicate });
        }
        // Stable sort keeps insertion order among equal priorities
        compiled.sort_by_key(|c| c.rule.priority);
        Ok(compiled)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
