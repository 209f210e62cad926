//! Safe predicate language for rule conditions
//!
//! Conditions like `country === "AE" && amount > 500000` are compiled into
//! reusable predicates by a self-contained tokenizer and recursive-descent
//! parser. Nothing is ever delegated to a host-language dynamic-code
//! facility: conditions may originate from configuration files, so the
//! grammar is closed and evaluation can only read the facts it is given.
//!
//! Parse errors are raised at compile time (rules fail fast at load).
//! Runtime lookups never fail: a missing key resolves to a distinguished
//! undefined value that is falsy and unequal to every non-null value.

#![deny(unsafe_code)]

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use error::{ExprError, Result};

use warden_types::Facts;

/// A compiled, stateless predicate
///
/// Safe to share and evaluate concurrently; evaluation never panics and
/// never errors (failures collapse to `false`).
#[derive(Debug, Clone)]
pub struct Predicate {
    source: String,
    ast: ast::Expr,
}

impl Predicate {
    /// The condition text this predicate was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a facts mapping
    pub fn eval(&self, facts: &Facts) -> bool {
        eval::truthy(&eval::eval_expr(&self.ast, facts))
    }
}

/// Compile a condition, raising on any syntax error
pub fn compile(source: &str) -> Result<Predicate> {
    let tokens = lexer::tokenize(source)?;
    let ast = parser::parse(&tokens)?;
    Ok(Predicate {
        source: source.to_string(),
        ast,
    })
}

/// Convenience one-shot evaluation: any error, including a parse error,
/// yields `false`
pub fn evaluate(source: &str, facts: &Facts) -> bool {
    match compile(source) {
        Ok(predicate) => predicate.eval(facts),
        Err(err) => {
            tracing::debug!(condition = source, error = %err, "condition failed to compile");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts(value: serde_json::Value) -> Facts {
        Facts::from_value(value)
    }

    #[test]
    fn comparison_operators() {
        let f = facts(json!({ "score": 90 }));
        assert!(evaluate("score >= 80", &f));
        assert!(evaluate("score > 89", &f));
        assert!(!evaluate("score < 90", &f));
        assert!(evaluate("score <= 90", &f));
        assert!(evaluate("score == 90", &f));
        assert!(evaluate("score != 91", &f));
    }

    #[test]
    fn strict_equality_needs_matching_types() {
        let f = facts(json!({ "count": 5, "label": "5" }));
        assert!(evaluate("count === 5", &f));
        assert!(!evaluate("label === 5", &f));
        assert!(evaluate("label !== 5", &f));
        // Loose comparison coerces the string
        assert!(evaluate("label == 5", &f));
    }

    #[test]
    fn logical_operators_and_precedence() {
        let f = facts(json!({ "a": true, "b": false, "c": true }));
        assert!(evaluate("a && c", &f));
        assert!(!evaluate("a && b", &f));
        assert!(evaluate("b || c", &f));
        // && binds tighter than ||
        assert!(evaluate("b && b || c", &f));
        assert!(!evaluate("b && (b || c)", &f));
    }

    #[test]
    fn negation() {
        let f = facts(json!({ "flag": false }));
        assert!(evaluate("!flag", &f));
        assert!(!evaluate("!!flag", &f));
    }

    #[test]
    fn dotted_paths_and_missing_keys() {
        let f = facts(json!({ "user": { "role": "admin" } }));
        assert!(evaluate("user.role === \"admin\"", &f));
        assert!(!evaluate("user.missing === \"admin\"", &f));
        // Missing resolves to undefined, which is falsy
        assert!(!evaluate("user.missing", &f));
        assert!(evaluate("user.missing == null", &f));
        assert!(!evaluate("user.role == null", &f));
    }

    #[test]
    fn string_literals_single_and_double_quoted() {
        let f = facts(json!({ "country": "AE" }));
        assert!(evaluate("country === \"AE\"", &f));
        assert!(evaluate("country === 'AE'", &f));
        assert!(evaluate("'it\\'s' === 'it\\'s'", &f));
    }

    #[test]
    fn non_numeric_ordering_is_false() {
        let f = facts(json!({ "name": "zed", "amount": null }));
        assert!(!evaluate("name > 3", &f));
        assert!(!evaluate("amount > 0", &f));
        assert!(!evaluate("amount < 0", &f));
    }

    #[test]
    fn booleans_compare_as_numbers_loosely() {
        let f = facts(json!({ "active": true }));
        assert!(evaluate("active == 1", &f));
        assert!(!evaluate("active == 2", &f));
        assert!(!evaluate("active === 1", &f));
    }

    #[test]
    fn undefined_keyword_is_null() {
        let f = facts(json!({}));
        assert!(evaluate("missing == undefined", &f));
        assert!(evaluate("missing === undefined", &f));
    }

    #[test]
    fn parse_errors_raise_on_compile() {
        assert!(compile("score >=").is_err());
        assert!(compile("&& score").is_err());
        assert!(compile("(score > 1").is_err());
        assert!(compile("score = 1").is_err());
        assert!(compile("\"unterminated").is_err());
    }

    #[test]
    fn evaluate_swallows_parse_errors() {
        let f = facts(json!({}));
        assert!(!evaluate("((", &f));
    }

    #[test]
    fn deterministic_across_repeated_calls() {
        let predicate = compile("score >= 30 && score < 80").unwrap();
        let f = facts(json!({ "score": 55 }));
        for _ in 0..100 {
            assert!(predicate.eval(&f));
        }
    }

    #[test]
    fn predicate_is_safe_for_concurrent_reuse() {
        use std::sync::Arc;
        let predicate = Arc::new(compile("amount > 500000").unwrap());
        let f = Arc::new(facts(json!({ "amount": 1_000_000 })));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = predicate.clone();
                let f = f.clone();
                std::thread::spawn(move || assert!(p.eval(&f)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn uae_investment_scenario() {
        let predicate = compile("country === \"AE\" && amount > 500000").unwrap();
        assert!(predicate.eval(&facts(json!({ "country": "AE", "amount": 1_000_000 }))));
        assert!(!predicate.eval(&facts(json!({ "country": "US", "amount": 1_000_000 }))));
    }
}
