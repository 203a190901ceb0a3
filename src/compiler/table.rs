//! Operator table
//!
//! Maps (operator, operand kind, operand) to a backend operator node.
//! String-only operators applied to non-string operands return the operand
//! unchanged. Unrecognized operators pass through in lenient mode; strict
//! mode already rejected them at parse time.

use serde_json::{json, Value};

use super::ast::ComparisonOp;
use super::kind::Kind;

/// Case-insensitive matching convention for the regex operators
const REGEX_OPTIONS: &str = "i";

/// Applies a comparison operator to a classified operand.
pub fn apply(op: &ComparisonOp, kind: Kind, operand: &Value) -> Value {
    match op {
        ComparisonOp::Eq => operand.clone(),
        ComparisonOp::Ne => json!({ "$ne": operand }),
        ComparisonOp::Lt => json!({ "$lt": operand }),
        ComparisonOp::Le => json!({ "$lte": operand }),
        ComparisonOp::Gt => json!({ "$gt": operand }),
        ComparisonOp::Ge => json!({ "$gte": operand }),
        ComparisonOp::In => apply_in(operand),
        ComparisonOp::Between => apply_between(operand),
        ComparisonOp::Exists => json!({ "$exists": coerce_exists(operand) }),
        ComparisonOp::Contains => apply_contains(kind, operand),
        ComparisonOp::NotContains => apply_not_contains(kind, operand),
        ComparisonOp::StartsWith => apply_starts_with(kind, operand),
        ComparisonOp::EndsWith => apply_ends_with(kind, operand),
        ComparisonOp::Other(_) => operand.clone(),
    }
}

/// `in`: array membership. Non-array operands pass through.
fn apply_in(operand: &Value) -> Value {
    if operand.is_array() {
        json!({ "$in": operand })
    } else {
        operand.clone()
    }
}

/// `between`: closed range from a 2-element array. Anything else passes
/// through.
fn apply_between(operand: &Value) -> Value {
    match operand.as_array() {
        Some(bounds) if bounds.len() == 2 => {
            json!({ "$gte": bounds[0], "$lte": bounds[1] })
        }
        _ => operand.clone(),
    }
}

/// `contains`: case-insensitive substring match
fn apply_contains(kind: Kind, operand: &Value) -> Value {
    match pattern_operand(kind, operand) {
        Some(pattern) => regex_node(pattern.to_string()),
        None => operand.clone(),
    }
}

/// `notContains`: negated case-insensitive substring match
fn apply_not_contains(kind: Kind, operand: &Value) -> Value {
    match pattern_operand(kind, operand) {
        Some(pattern) => json!({ "$not": regex_node(pattern.to_string()) }),
        None => operand.clone(),
    }
}

/// `startsWith`: anchors the pattern at the start
fn apply_starts_with(kind: Kind, operand: &Value) -> Value {
    match pattern_operand(kind, operand) {
        Some(pattern) => regex_node(format!("^{}", pattern)),
        None => operand.clone(),
    }
}

/// `endsWith`: anchors the pattern at the end
fn apply_ends_with(kind: Kind, operand: &Value) -> Value {
    match pattern_operand(kind, operand) {
        Some(pattern) => regex_node(format!("{}$", pattern)),
        None => operand.clone(),
    }
}

/// String operand for the regex operators; None for any other kind
fn pattern_operand(kind: Kind, operand: &Value) -> Option<&str> {
    if kind.is_string() {
        operand.as_str()
    } else {
        None
    }
}

fn regex_node(pattern: String) -> Value {
    json!({ "$regex": pattern, "$options": REGEX_OPTIONS })
}

/// Coerces the `exists` operand to 0 or 1.
///
/// Bool maps directly; numbers and numeric strings are 1 when nonzero.
/// Coercion failure resolves to 0, never to an error.
fn coerce_exists(operand: &Value) -> i64 {
    match operand {
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f != 0.0 => 1,
            _ => 0,
        },
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) if n != 0 => 1,
            _ => 0,
        },
        _ => 0,
    }
}
