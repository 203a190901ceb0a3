//! In-memory document collection
//!
//! Stand-in for the live document store the facade talks to. Documents are
//! plain JSON objects keyed by `_id`; insertion order is preserved.

use serde_json::Value;
use uuid::Uuid;

/// In-memory document collection
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Vec<Value>,
}

impl Collection {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    /// Inserts a document, assigning a generated `_id` when absent.
    ///
    /// Returns the document id.
    pub fn insert(&mut self, mut document: Value) -> String {
        let id = match document.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        if let Some(object) = document.as_object_mut() {
            object.insert("_id".to_string(), Value::String(id.clone()));
        }
        self.documents.push(document);
        id
    }

    /// All documents, in insertion order
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when no documents are stored
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Keeps only documents for which the predicate holds.
    ///
    /// Returns the number of removed documents.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Value) -> bool,
    {
        let before = self.documents.len();
        self.documents.retain(keep);
        before - self.documents.len()
    }

    /// Applies an edit to every document the predicate selects.
    ///
    /// Returns the number of edited documents.
    pub fn update_where<P, F>(&mut self, mut selects: P, mut apply: F) -> usize
    where
        P: FnMut(&Value) -> bool,
        F: FnMut(&mut Value),
    {
        let mut touched = 0;
        for document in &mut self.documents {
            if selects(document) {
                apply(document);
                touched += 1;
            }
        }
        touched
    }
}
