//! Compiler driver
//!
//! Walks a parsed filter and produces the backend-native filter document.
//! Logical combinators recurse the full driver over their sub-filters and
//! merge under synthesized top-level `$and`/`$or` keys.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::ast::{FieldPredicate, FilterEntry, FilterExpr};
use super::errors::CompileResult;
use super::kind::Kind;
use super::parser;
use super::table;

/// Unknown-operator policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorMode {
    /// Unknown operator names pass the operand through unchanged
    #[default]
    Lenient,
    /// Unknown operator names are rejected at parse time
    Strict,
}

/// Compiled backend filter document
///
/// A freshly constructed map of field names (or synthesized `$and`/`$or`
/// keys) to literals and operator nodes. Emptiness is observable
/// structurally via [`CompiledFilter::is_empty`]; callers must never test
/// it by instance identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledFilter(Map<String, Value>);

impl CompiledFilter {
    /// The empty filter: matches every document
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the filter constrains nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a top-level entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Synthesizes the aggregation pipeline's initial `$match` stage
    pub fn to_match_stage(&self) -> Value {
        json!({ "$match": self.0 })
    }

    fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }
}

impl From<CompiledFilter> for Value {
    fn from(filter: CompiledFilter) -> Value {
        filter.into_value()
    }
}

/// Filter compiler
///
/// Pure and stateless: safe to share across threads and to invoke any
/// number of times; identical input always compiles to structurally
/// identical output. The input is never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCompiler {
    mode: OperatorMode,
}

impl FilterCompiler {
    /// Lenient compiler (the default policy)
    pub fn new() -> Self {
        Self {
            mode: OperatorMode::Lenient,
        }
    }

    /// Strict compiler: unknown operator names are compile errors
    pub fn strict() -> Self {
        Self {
            mode: OperatorMode::Strict,
        }
    }

    /// Compiler with an explicit mode
    pub fn with_mode(mode: OperatorMode) -> Self {
        Self { mode }
    }

    /// Returns the configured mode
    pub fn mode(&self) -> OperatorMode {
        self.mode
    }

    /// Compiles a raw JSON filter into a backend filter document.
    ///
    /// Lenient compilation cannot fail; strict compilation fails on
    /// unrecognized operator names.
    pub fn compile(&self, filter: &Value) -> CompileResult<CompiledFilter> {
        let parsed = parser::parse(filter, self.mode)?;
        Ok(self.compile_expr(&parsed))
    }

    /// Compiles a parsed filter expression. Total over the AST.
    pub fn compile_expr(&self, filter: &FilterExpr) -> CompiledFilter {
        let mut out = CompiledFilter::empty();

        for entry in filter.entries() {
            match entry {
                FilterEntry::Field { name, predicate } => {
                    out.insert(name.clone(), self.compile_predicate(predicate));
                }
                FilterEntry::Logical { op, branches } => {
                    // Each branch is a full filter; the combinator merges
                    // into one synthesized top-level key
                    let compiled: Vec<Value> = branches
                        .iter()
                        .map(|branch| self.compile_expr(branch).into_value())
                        .collect();
                    out.insert(op.backend_key().to_string(), Value::Array(compiled));
                }
            }
        }

        out
    }

    fn compile_predicate(&self, predicate: &FieldPredicate) -> Value {
        match predicate {
            FieldPredicate::Literal(value) => value.clone(),
            FieldPredicate::Clause { op, operand } => {
                table::apply(op, Kind::of(operand), operand)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileError;

    #[test]
    fn test_empty_filter_compiles_empty() {
        let compiled = FilterCompiler::new().compile(&json!({})).unwrap();
        assert!(compiled.is_empty());
        assert_eq!(compiled.len(), 0);
    }

    #[test]
    fn test_literal_shorthand_passthrough() {
        let compiled = FilterCompiler::new()
            .compile(&json!({"status": "active", "age": 30}))
            .unwrap();
        assert_eq!(compiled.get("status"), Some(&json!("active")));
        assert_eq!(compiled.get("age"), Some(&json!(30)));
    }

    #[test]
    fn test_operator_clause_dispatch() {
        let compiled = FilterCompiler::new()
            .compile(&json!({"age": {"ge": 18}}))
            .unwrap();
        assert_eq!(compiled.get("age"), Some(&json!({"$gte": 18})));
    }

    #[test]
    fn test_logical_combinator_merges_top_level() {
        let compiled = FilterCompiler::new()
            .compile(&json!({"or": [{"a": {"ne": 1}}, {"b": {"eq": 2}}]}))
            .unwrap();

        // The combinator contributes a single synthesized key, not a
        // field-named one
        assert_eq!(compiled.len(), 1);
        assert_eq!(
            compiled.get("$or"),
            Some(&json!([{"a": {"$ne": 1}}, {"b": 2}]))
        );
    }

    #[test]
    fn test_nested_logical_recursion() {
        let compiled = FilterCompiler::new()
            .compile(&json!({
                "and": [
                    {"or": [{"x": 1}, {"y": 2}]},
                    {"z": {"lt": 3}}
                ]
            }))
            .unwrap();

        assert_eq!(
            compiled.get("$and"),
            Some(&json!([
                {"$or": [{"x": 1}, {"y": 2}]},
                {"z": {"$lt": 3}}
            ]))
        );
    }

    #[test]
    fn test_determinism() {
        let filter = json!({"a": {"contains": "x"}, "or": [{"b": 1}], "c": 2});
        let compiler = FilterCompiler::new();
        assert_eq!(
            compiler.compile(&filter).unwrap(),
            compiler.compile(&filter).unwrap()
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let filter = json!({"age": {"between": [18, 65]}});
        let before = filter.clone();
        let _ = FilterCompiler::new().compile(&filter).unwrap();
        assert_eq!(filter, before);
    }

    #[test]
    fn test_strict_mode_errors() {
        let result = FilterCompiler::strict().compile(&json!({"a": {"nope": 1}}));
        assert_eq!(result, Err(CompileError::UnknownOperator("nope".to_string())));
    }

    #[test]
    fn test_match_stage_synthesis() {
        let compiled = FilterCompiler::new()
            .compile(&json!({"age": {"gt": 21}}))
            .unwrap();
        assert_eq!(
            compiled.to_match_stage(),
            json!({"$match": {"age": {"$gt": 21}}})
        );
    }
}
