//! Semantic type classification for filter operands
//!
//! Several operators are defined only for string operands. Classification
//! lets the operator table degrade to a safe pass-through for everything
//! else instead of erroring.

use serde_json::Value;

/// Semantic kind of a filter operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Int,
    Float,
    Boolean,
    Array,
    Object,
    Other,
}

impl Kind {
    /// Classifies a raw JSON value.
    ///
    /// Numbers with a zero fractional part classify as `Int`, all other
    /// numbers as `Float`. `null` classifies as `Other`. Classification is
    /// deterministic and never fails.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Boolean,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Kind::Int
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 => Kind::Int,
                        Some(_) => Kind::Float,
                        None => Kind::Other,
                    }
                }
            }
            Value::Null => Kind::Other,
        }
    }

    /// Returns true for string operands
    pub fn is_string(&self) -> bool {
        matches!(self, Kind::String)
    }

    /// Returns the kind name for logging output
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Other => "other",
        }
    }
}
