//! Update-payload sanitation
//!
//! Update payloads arriving from the API may carry fields the caller left
//! blank. Writing those would erase stored values, so they are stripped
//! before the merge. Shallow by design: nested objects are opaque update
//! values.

use serde_json::Value;

/// Returns a copy of the payload without "empty" top-level entries.
///
/// An entry is empty when its value is `null` or the empty string. `false`
/// and `0` are meaningful values and are kept. Non-object payloads pass
/// through unchanged.
pub fn strip_empty(payload: &Value) -> Value {
    match payload.as_object() {
        Some(object) => {
            let kept = object
                .iter()
                .filter(|(_, value)| !is_empty_value(value))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Value::Object(kept)
        }
        None => payload.clone(),
    }
}

/// True for values an update must not write
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_null_and_empty_string() {
        let payload = json!({"name": "Alice", "email": null, "phone": ""});
        assert_eq!(strip_empty(&payload), json!({"name": "Alice"}));
    }

    #[test]
    fn test_keeps_falsy_but_meaningful_values() {
        let payload = json!({"active": false, "count": 0, "items": []});
        assert_eq!(strip_empty(&payload), payload);
    }

    #[test]
    fn test_shallow_only() {
        // Nested empties are part of the replacement value, not stripped
        let payload = json!({"address": {"street": ""}});
        assert_eq!(strip_empty(&payload), payload);
    }

    #[test]
    fn test_non_object_passthrough() {
        assert_eq!(strip_empty(&json!("raw")), json!("raw"));
        assert_eq!(strip_empty(&json!(null)), json!(null));
    }

    #[test]
    fn test_input_not_mutated() {
        let payload = json!({"a": null});
        let before = payload.clone();
        let _ = strip_empty(&payload);
        assert_eq!(payload, before);
    }
}
