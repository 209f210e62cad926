//! Evaluation semantics for compiled conditions
//!
//! Evaluation never errors: missing keys resolve to `Undefined`, failed
//! coercions collapse to `false`. The coercion table:
//!
//! - `===` / `!==` compare by value and type, no coercion. `null` and
//!   `undefined` are one sentinel at the language level and compare equal.
//! - `==` / `!=`: numeric-to-string comparison parses the string as a
//!   number (unparseable means false); booleans compare as 0/1; the
//!   nullish sentinel equals only itself; containers compare by deep
//!   equality against other containers and nothing else.
//! - Ordering requires both operands to coerce to numbers, else false.

use serde_json::Value;
use warden_types::Facts;

use crate::ast::{CmpOp, Expr, Literal};

/// Runtime value, a superset of the literal domain
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EvalValue {
    /// Missing key: falsy, unequal to every non-null value
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Arrays and objects resolved from the facts tree
    Complex(Value),
}

impl EvalValue {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => EvalValue::Null,
            Value::Bool(b) => EvalValue::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => EvalValue::Number(f),
                None => EvalValue::Complex(value.clone()),
            },
            Value::String(s) => EvalValue::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => EvalValue::Complex(value.clone()),
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, EvalValue::Undefined | EvalValue::Null)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            EvalValue::Number(n) => Some(*n),
            EvalValue::Bool(true) => Some(1.0),
            EvalValue::Bool(false) => Some(0.0),
            EvalValue::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Truthiness at the boolean boundary
pub(crate) fn truthy(value: &EvalValue) -> bool {
    match value {
        EvalValue::Undefined | EvalValue::Null => false,
        EvalValue::Bool(b) => *b,
        EvalValue::Number(n) => *n != 0.0 && !n.is_nan(),
        EvalValue::Str(s) => !s.is_empty(),
        EvalValue::Complex(_) => true,
    }
}

pub(crate) fn eval_expr(expr: &Expr, facts: &Facts) -> EvalValue {
    match expr {
        Expr::Or(lhs, rhs) => {
            let left = eval_expr(lhs, facts);
            if truthy(&left) {
                EvalValue::Bool(true)
            } else {
                EvalValue::Bool(truthy(&eval_expr(rhs, facts)))
            }
        }
        Expr::And(lhs, rhs) => {
            let left = eval_expr(lhs, facts);
            if !truthy(&left) {
                EvalValue::Bool(false)
            } else {
                EvalValue::Bool(truthy(&eval_expr(rhs, facts)))
            }
        }
        Expr::Not(inner) => EvalValue::Bool(!truthy(&eval_expr(inner, facts))),
        Expr::Cmp { op, lhs, rhs } => {
            let left = eval_expr(lhs, facts);
            let right = eval_expr(rhs, facts);
            EvalValue::Bool(compare(*op, &left, &right))
        }
        Expr::Literal(literal) => match literal {
            Literal::Number(n) => EvalValue::Number(*n),
            Literal::Str(s) => EvalValue::Str(s.clone()),
            Literal::Bool(b) => EvalValue::Bool(*b),
            Literal::Null => EvalValue::Null,
        },
        Expr::Path(segments) => resolve_path(segments, facts),
    }
}

fn resolve_path(segments: &[String], facts: &Facts) -> EvalValue {
    let path = segments.join(".");
    match facts.lookup(&path) {
        Some(value) => EvalValue::from_json(value),
        None => EvalValue::Undefined,
    }
}

fn compare(op: CmpOp, lhs: &EvalValue, rhs: &EvalValue) -> bool {
    match op {
        CmpOp::StrictEq => strict_eq(lhs, rhs),
        CmpOp::StrictNe => !strict_eq(lhs, rhs),
        CmpOp::LooseEq => loose_eq(lhs, rhs),
        CmpOp::LooseNe => !loose_eq(lhs, rhs),
        CmpOp::Gt | CmpOp::Ge | CmpOp::Lt | CmpOp::Le => {
            let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
                return false;
            };
            match op {
                CmpOp::Gt => a > b,
                CmpOp::Ge => a >= b,
                CmpOp::Lt => a < b,
                CmpOp::Le => a <= b,
                _ => unreachable!(),
            }
        }
    }
}

fn strict_eq(lhs: &EvalValue, rhs: &EvalValue) -> bool {
    match (lhs, rhs) {
        (a, b) if a.is_nullish() && b.is_nullish() => true,
        (EvalValue::Bool(a), EvalValue::Bool(b)) => a == b,
        (EvalValue::Number(a), EvalValue::Number(b)) => a == b,
        (EvalValue::Str(a), EvalValue::Str(b)) => a == b,
        (EvalValue::Complex(a), EvalValue::Complex(b)) => a == b,
        _ => false,
    }
}

fn loose_eq(lhs: &EvalValue, rhs: &EvalValue) -> bool {
    match (lhs, rhs) {
        (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
        (EvalValue::Str(a), EvalValue::Str(b)) => a == b,
        (EvalValue::Complex(a), EvalValue::Complex(b)) => a == b,
        (EvalValue::Complex(_), _) | (_, EvalValue::Complex(_)) => false,
        // Remaining mixes are numeric after coercion: bool as 0/1,
        // string parsed as a number
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}
