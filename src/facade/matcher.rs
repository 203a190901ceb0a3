//! Compiled-filter evaluation
//!
//! Evaluates a backend filter document against stored documents. Literal
//! equality is exact, with no type coercion. Ordered comparisons hold for
//! numbers (via f64) and strings (lexicographic); cross-type comparisons
//! never match. Missing fields fail every per-field node except
//! `$exists: 0`.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Map, Value};

use crate::compiler::CompiledFilter;

/// Evaluates compiled filters against documents
pub struct FilterMatcher;

impl FilterMatcher {
    /// Checks whether a document matches every entry of a compiled filter.
    ///
    /// An empty filter matches every document.
    pub fn matches(document: &Value, filter: &CompiledFilter) -> bool {
        filter
            .as_map()
            .iter()
            .all(|(key, node)| Self::matches_entry(document, key, node))
    }

    /// Matches one top-level entry (a field node or a logical combinator)
    fn matches_entry(document: &Value, key: &str, node: &Value) -> bool {
        match key {
            "$and" => match node.as_array() {
                Some(branches) => branches
                    .iter()
                    .all(|branch| Self::matches_object(document, branch)),
                None => false,
            },
            "$or" => match node.as_array() {
                Some(branches) => branches
                    .iter()
                    .any(|branch| Self::matches_object(document, branch)),
                None => false,
            },
            field => Self::matches_node(document.get(field), node),
        }
    }

    /// Matches a compiled sub-filter branch (a plain JSON filter object)
    fn matches_object(document: &Value, filter: &Value) -> bool {
        match filter.as_object() {
            Some(entries) => entries
                .iter()
                .all(|(key, node)| Self::matches_entry(document, key, node)),
            None => false,
        }
    }

    /// Matches one field node against the field's value, if present.
    ///
    /// Operator nodes are objects whose keys all start with `$`; anything
    /// else is a literal compared for exact equality.
    fn matches_node(field_value: Option<&Value>, node: &Value) -> bool {
        if let Some(ops) = node.as_object() {
            if !ops.is_empty() && ops.keys().all(|key| key.starts_with('$')) {
                return Self::matches_ops(field_value, ops);
            }
        }

        // Literal equality; missing fields never match
        match field_value {
            Some(actual) => actual == node,
            None => false,
        }
    }

    /// Matches an operator node; all operators in the node must hold
    fn matches_ops(field_value: Option<&Value>, ops: &Map<String, Value>) -> bool {
        let options = ops.get("$options").and_then(Value::as_str).unwrap_or("");

        ops.iter().all(|(op, operand)| match op.as_str() {
            // Consumed by $regex
            "$options" => true,
            "$exists" => {
                let wanted = operand.as_i64().unwrap_or(0) != 0;
                field_value.is_some() == wanted
            }
            "$not" => !Self::matches_node(field_value, operand),
            op => match field_value {
                Some(actual) => Self::matches_comparison(actual, op, operand, options),
                None => false,
            },
        })
    }

    /// Matches a single comparison operator against a present field value
    fn matches_comparison(actual: &Value, op: &str, operand: &Value, options: &str) -> bool {
        match op {
            "$ne" => actual != operand,
            "$lt" => matches!(Self::compare(actual, operand), Some(Ordering::Less)),
            "$lte" => matches!(
                Self::compare(actual, operand),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
            "$gt" => matches!(Self::compare(actual, operand), Some(Ordering::Greater)),
            "$gte" => matches!(
                Self::compare(actual, operand),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            "$in" => match operand.as_array() {
                Some(candidates) => Self::in_match(actual, candidates),
                None => false,
            },
            "$regex" => Self::regex_match(actual, operand, options),
            // Unknown backend operator never matches
            _ => false,
        }
    }

    /// Ordered comparison: numbers via f64, strings lexicographically.
    /// Cross-type comparisons yield no ordering.
    fn compare(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
                (Some(xf), Some(yf)) => xf.partial_cmp(&yf),
                _ => None,
            },
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    /// `$in`: scalar membership, or any overlap for array field values
    fn in_match(actual: &Value, candidates: &[Value]) -> bool {
        match actual {
            Value::Array(items) => items.iter().any(|item| candidates.contains(item)),
            scalar => candidates.contains(scalar),
        }
    }

    /// `$regex` with `$options`: "i" selects case-insensitive matching.
    /// Invalid patterns and non-string field values never match.
    fn regex_match(actual: &Value, pattern: &Value, options: &str) -> bool {
        let text = match actual.as_str() {
            Some(text) => text,
            None => return false,
        };
        let pattern = match pattern.as_str() {
            Some(pattern) => pattern,
            None => return false,
        };

        let pattern = if options.contains('i') {
            format!("(?i){}", pattern)
        } else {
            pattern.to_string()
        };

        match Regex::new(&pattern) {
            Ok(re) => re.is_match(text),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::FilterCompiler;
    use serde_json::json;

    fn compiled(filter: Value) -> CompiledFilter {
        FilterCompiler::new().compile(&filter).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let doc = json!({"name": "Alice"});
        assert!(FilterMatcher::matches(&doc, &compiled(json!({}))));
    }

    #[test]
    fn test_literal_equality_no_coercion() {
        let doc = json!({"value": 123});

        assert!(FilterMatcher::matches(&doc, &compiled(json!({"value": 123}))));
        // String "123" must not match integer 123
        assert!(!FilterMatcher::matches(
            &doc,
            &compiled(json!({"value": "123"}))
        ));
    }

    #[test]
    fn test_missing_field_no_match() {
        let doc = json!({"name": "Alice"});
        assert!(!FilterMatcher::matches(&doc, &compiled(json!({"age": 30}))));
        assert!(!FilterMatcher::matches(
            &doc,
            &compiled(json!({"age": {"ne": 30}}))
        ));
    }

    #[test]
    fn test_range_operators() {
        let doc = json!({"age": 25});

        assert!(FilterMatcher::matches(&doc, &compiled(json!({"age": {"ge": 18}}))));
        assert!(FilterMatcher::matches(&doc, &compiled(json!({"age": {"le": 25}}))));
        assert!(!FilterMatcher::matches(&doc, &compiled(json!({"age": {"gt": 25}}))));
        assert!(!FilterMatcher::matches(&doc, &compiled(json!({"age": {"lt": 25}}))));
    }

    #[test]
    fn test_between_matches_closed_range() {
        let filter = compiled(json!({"age": {"between": [18, 65]}}));

        assert!(FilterMatcher::matches(&json!({"age": 18}), &filter));
        assert!(FilterMatcher::matches(&json!({"age": 40}), &filter));
        assert!(FilterMatcher::matches(&json!({"age": 65}), &filter));
        assert!(!FilterMatcher::matches(&json!({"age": 17}), &filter));
        assert!(!FilterMatcher::matches(&json!({"age": 66}), &filter));
    }

    #[test]
    fn test_cross_type_comparison_never_matches() {
        let doc = json!({"age": "25"});
        assert!(!FilterMatcher::matches(&doc, &compiled(json!({"age": {"gt": 18}}))));
    }

    #[test]
    fn test_in_membership() {
        let filter = compiled(json!({"status": {"in": ["active", "pending"]}}));

        assert!(FilterMatcher::matches(&json!({"status": "active"}), &filter));
        assert!(!FilterMatcher::matches(&json!({"status": "closed"}), &filter));
    }

    #[test]
    fn test_in_overlap_for_array_fields() {
        let filter = compiled(json!({"tags": {"in": ["rust"]}}));

        assert!(FilterMatcher::matches(
            &json!({"tags": ["db", "rust"]}),
            &filter
        ));
        assert!(!FilterMatcher::matches(&json!({"tags": ["db"]}), &filter));
    }

    #[test]
    fn test_exists_presence() {
        let present = compiled(json!({"email": {"exists": "1"}}));
        let absent = compiled(json!({"email": {"exists": "0"}}));

        let with_email = json!({"email": "x@y.com"});
        let without_email = json!({"name": "Alice"});

        assert!(FilterMatcher::matches(&with_email, &present));
        assert!(!FilterMatcher::matches(&without_email, &present));
        assert!(FilterMatcher::matches(&without_email, &absent));
        assert!(!FilterMatcher::matches(&with_email, &absent));
    }

    #[test]
    fn test_regex_case_insensitive() {
        let filter = compiled(json!({"firstname": {"contains": "dump"}}));

        assert!(FilterMatcher::matches(
            &json!({"firstname": "Humpty Dumpty"}),
            &filter
        ));
        assert!(!FilterMatcher::matches(
            &json!({"firstname": "Alice"}),
            &filter
        ));
    }

    #[test]
    fn test_anchored_regex() {
        let starts = compiled(json!({"name": {"startsWith": "al"}}));
        let ends = compiled(json!({"name": {"endsWith": "ce"}}));

        assert!(FilterMatcher::matches(&json!({"name": "Alice"}), &starts));
        assert!(!FilterMatcher::matches(&json!({"name": "Malice"}), &starts));
        assert!(FilterMatcher::matches(&json!({"name": "Alice"}), &ends));
        assert!(!FilterMatcher::matches(&json!({"name": "Alicea"}), &ends));
    }

    #[test]
    fn test_not_negates() {
        let filter = compiled(json!({"name": {"notContains": "spam"}}));

        assert!(FilterMatcher::matches(&json!({"name": "Alice"}), &filter));
        assert!(!FilterMatcher::matches(
            &json!({"name": "spamlord"}),
            &filter
        ));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        let filter = compiled(json!({"name": {"contains": "("}}));
        assert!(!FilterMatcher::matches(&json!({"name": "("}), &filter));
    }

    #[test]
    fn test_logical_combinators() {
        let filter = compiled(json!({"or": [{"a": 1}, {"b": 2}]}));

        assert!(FilterMatcher::matches(&json!({"a": 1}), &filter));
        assert!(FilterMatcher::matches(&json!({"b": 2}), &filter));
        assert!(!FilterMatcher::matches(&json!({"a": 2, "b": 1}), &filter));

        let filter = compiled(json!({"and": [{"a": 1}, {"b": 2}]}));

        assert!(FilterMatcher::matches(&json!({"a": 1, "b": 2}), &filter));
        assert!(!FilterMatcher::matches(&json!({"a": 1}), &filter));
    }
}
