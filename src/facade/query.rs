//! Data-access facade
//!
//! Issues query operations against a document collection using compiled
//! filters. The facade never mutates a filter it receives; filter
//! emptiness is checked structurally via `CompiledFilter::is_empty`.

use std::cmp::Ordering;

use serde_json::{json, Value};

use crate::compiler::CompiledFilter;
use crate::observability::Logger;

use super::collection::Collection;
use super::errors::{FacadeError, FacadeResult};
use super::matcher::FilterMatcher;
use super::page::{Page, PageRequest};
use super::sanitize;

/// Aggregation stages the facade can execute after the initial match
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Sort by a single field; descending when `ascending` is false
    Sort { field: String, ascending: bool },
    /// Drop the first n documents
    Skip(u64),
    /// Keep at most n documents
    Limit(u64),
    /// Collapse the stream to a single `{"count": n}` document
    Count,
}

impl Stage {
    /// Parses a JSON pipeline stage.
    ///
    /// Stages are single-key objects; anything the facade cannot execute
    /// is rejected rather than silently skipped.
    pub fn parse(stage: &Value) -> FacadeResult<Stage> {
        let object = match stage.as_object() {
            Some(object) if object.len() == 1 => object,
            _ => return Err(FacadeError::UnsupportedStage(stage.to_string())),
        };

        let (name, spec) = match object.iter().next() {
            Some(entry) => entry,
            None => return Err(FacadeError::UnsupportedStage(stage.to_string())),
        };

        match name.as_str() {
            "$sort" => Self::parse_sort(spec),
            "$skip" => match spec.as_u64() {
                Some(n) => Ok(Stage::Skip(n)),
                None => Err(FacadeError::UnsupportedStage(stage.to_string())),
            },
            "$limit" => match spec.as_u64() {
                Some(n) => Ok(Stage::Limit(n)),
                None => Err(FacadeError::UnsupportedStage(stage.to_string())),
            },
            "$count" => Ok(Stage::Count),
            other => Err(FacadeError::UnsupportedStage(other.to_string())),
        }
    }

    /// `$sort` spec: single field mapped to 1 (ascending) or -1
    fn parse_sort(spec: &Value) -> FacadeResult<Stage> {
        let object = match spec.as_object() {
            Some(object) if object.len() == 1 => object,
            _ => return Err(FacadeError::UnsupportedStage(spec.to_string())),
        };

        match object.iter().next() {
            Some((field, direction)) => Ok(Stage::Sort {
                field: field.clone(),
                ascending: direction.as_i64().unwrap_or(1) >= 0,
            }),
            None => Err(FacadeError::UnsupportedStage(spec.to_string())),
        }
    }
}

/// Data-access facade over a document collection
pub struct QueryFacade<'a> {
    collection: &'a mut Collection,
}

impl<'a> QueryFacade<'a> {
    /// Creates a facade over the given collection
    pub fn new(collection: &'a mut Collection) -> Self {
        Self { collection }
    }

    /// Returns the first document matching the filter.
    pub fn find_one(&self, filter: &CompiledFilter) -> Option<Value> {
        self.collection
            .documents()
            .iter()
            .find(|doc| FilterMatcher::matches(doc, filter))
            .cloned()
    }

    /// Returns one page of documents matching the filter.
    ///
    /// Flow:
    /// 1. Validate the page request
    /// 2. Scan and match
    /// 3. Slice the requested page and attach totals
    pub fn find(&self, filter: &CompiledFilter, page: &PageRequest) -> FacadeResult<Page> {
        page.validate()?;

        let matched: Vec<&Value> = self
            .collection
            .documents()
            .iter()
            .filter(|doc| FilterMatcher::matches(doc, filter))
            .collect();

        let total = matched.len() as u64;
        let items: Vec<Value> = matched
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect();

        Logger::trace(
            "FACADE_FIND",
            &[
                ("matched", json!(total)),
                ("page", json!(page.page)),
                ("returned", json!(items.len())),
            ],
        );

        Ok(Page::new(items, page, total))
    }

    /// Counts documents matching the filter.
    ///
    /// A structurally empty filter short-circuits to the collection length
    /// instead of scanning.
    pub fn count(&self, filter: &CompiledFilter) -> u64 {
        if filter.is_empty() {
            return self.collection.len() as u64;
        }

        self.collection
            .documents()
            .iter()
            .filter(|doc| FilterMatcher::matches(doc, filter))
            .count() as u64
    }

    /// Synthesizes the aggregation pipeline's initial `$match` stage.
    pub fn match_stage(filter: &CompiledFilter) -> Value {
        filter.to_match_stage()
    }

    /// Runs the match stage followed by the given pipeline stages.
    ///
    /// Flow:
    /// 1. Parse every stage up front (a bad pipeline runs nothing)
    /// 2. Match documents with the compiled filter
    /// 3. Apply the stages in order
    pub fn aggregate(&self, filter: &CompiledFilter, stages: &[Value]) -> FacadeResult<Vec<Value>> {
        let mut parsed = Vec::with_capacity(stages.len());
        for stage in stages {
            parsed.push(Stage::parse(stage)?);
        }

        let mut documents: Vec<Value> = self
            .collection
            .documents()
            .iter()
            .filter(|doc| FilterMatcher::matches(doc, filter))
            .cloned()
            .collect();

        for stage in &parsed {
            match stage {
                Stage::Sort { field, ascending } => {
                    documents.sort_by(|a, b| {
                        let ordering = compare_for_sort(a.get(field.as_str()), b.get(field.as_str()));
                        if *ascending {
                            ordering
                        } else {
                            ordering.reverse()
                        }
                    });
                }
                Stage::Skip(n) => {
                    documents = documents.into_iter().skip(*n as usize).collect();
                }
                Stage::Limit(n) => {
                    documents.truncate(*n as usize);
                }
                Stage::Count => {
                    documents = vec![json!({"count": documents.len()})];
                }
            }
        }

        Ok(documents)
    }

    /// Applies a sanitized shallow merge to every matching document.
    ///
    /// Flow:
    /// 1. Sanitize the update payload
    /// 2. Match documents with the compiled filter
    /// 3. Merge payload fields into each match
    ///
    /// Returns the number of updated documents.
    pub fn update_many(&mut self, filter: &CompiledFilter, changes: &Value) -> FacadeResult<u64> {
        let changes = sanitize::strip_empty(changes);
        let fields = match changes.as_object() {
            Some(object) => object.clone(),
            None => {
                return Err(FacadeError::InvalidUpdate(
                    "update payload must be an object".to_string(),
                ))
            }
        };

        let updated = self.collection.update_where(
            |doc| FilterMatcher::matches(doc, filter),
            |doc| {
                if let Some(object) = doc.as_object_mut() {
                    for (key, value) in &fields {
                        object.insert(key.clone(), value.clone());
                    }
                }
            },
        );

        Logger::info(
            "FACADE_UPDATE",
            &[
                ("updated", json!(updated)),
                ("fields", json!(fields.len())),
            ],
        );

        Ok(updated as u64)
    }

    /// Removes every matching document.
    ///
    /// Returns the number of removed documents.
    pub fn delete_many(&mut self, filter: &CompiledFilter) -> u64 {
        let removed = self
            .collection
            .retain(|doc| !FilterMatcher::matches(doc, filter));

        Logger::info("FACADE_DELETE", &[("removed", json!(removed))]);

        removed as u64
    }
}

/// Total ordering for the `$sort` stage.
///
/// Ordering rules: missing < null < bool < number < string < array < object;
/// same-type values use natural ordering. Arrays and objects compare equal
/// among themselves so the sort stays stable.
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let type_order = |value: &Value| -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    };

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => {
                    let xf = x.as_f64().unwrap_or(0.0);
                    let yf = y.as_f64().unwrap_or(0.0);
                    xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}
