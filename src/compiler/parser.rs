//! Boundary parser for raw JSON filters
//!
//! Resolves the operator-clause-versus-literal ambiguity structurally: an
//! object is an operator clause iff it contains exactly one key. Multi-key
//! objects are literal equality values. The reserved field names `and` and
//! `or` form logical combinators only when their value is an array.

use serde_json::Value;

use super::ast::{ComparisonOp, FieldPredicate, FilterEntry, FilterExpr, LogicalOp};
use super::compile::OperatorMode;
use super::errors::{CompileError, CompileResult};

/// Parses a raw JSON filter into the closed AST.
///
/// Non-object input parses as the empty filter. In strict mode an
/// unrecognized operator name is rejected here, before compilation.
pub fn parse(filter: &Value, mode: OperatorMode) -> CompileResult<FilterExpr> {
    let object = match filter.as_object() {
        Some(object) => object,
        None => return Ok(FilterExpr::default()),
    };

    let mut entries = Vec::with_capacity(object.len());
    for (field, value) in object {
        entries.push(parse_entry(field, value, mode)?);
    }
    Ok(FilterExpr::new(entries))
}

/// Parses one field entry
fn parse_entry(field: &str, value: &Value, mode: OperatorMode) -> CompileResult<FilterEntry> {
    // Logical combinator: reserved name whose value is an array of
    // sub-filters. Anything else falls through to ordinary field handling.
    if let Some(op) = LogicalOp::parse(field) {
        if let Value::Array(items) = value {
            let mut branches = Vec::with_capacity(items.len());
            for item in items {
                branches.push(parse(item, mode)?);
            }
            return Ok(FilterEntry::Logical { op, branches });
        }
    }

    Ok(FilterEntry::Field {
        name: field.to_string(),
        predicate: parse_predicate(value, mode)?,
    })
}

/// Parses a field's value into a predicate
fn parse_predicate(value: &Value, mode: OperatorMode) -> CompileResult<FieldPredicate> {
    if let Some(object) = value.as_object() {
        if object.len() == 1 {
            if let Some((name, operand)) = object.iter().next() {
                let op = ComparisonOp::parse(name);
                if mode == OperatorMode::Strict && !op.is_recognized() {
                    return Err(CompileError::UnknownOperator(name.clone()));
                }
                return Ok(FieldPredicate::Clause {
                    op,
                    operand: operand.clone(),
                });
            }
        }
    }

    // Bare literal, multi-key object, or empty object: equality shorthand
    Ok(FieldPredicate::Literal(value.clone()))
}
