//! Parsed filter representation
//!
//! The boundary parser resolves the raw JSON filter into this closed set of
//! variants. Past this point the compiler is a total function: no
//! operator-versus-literal guessing and no key-iteration-order reliance.

use serde_json::Value;

/// Comparison operators accepted in an operator clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Between,
    Exists,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    /// Unrecognized operator name, carried for lenient pass-through
    Other(String),
}

impl ComparisonOp {
    /// Parses an operator name.
    ///
    /// `beginsWith` is a compatibility alias for `startsWith` and is
    /// normalized on entry.
    pub fn parse(name: &str) -> ComparisonOp {
        match name {
            "eq" => ComparisonOp::Eq,
            "ne" => ComparisonOp::Ne,
            "lt" => ComparisonOp::Lt,
            "le" => ComparisonOp::Le,
            "gt" => ComparisonOp::Gt,
            "ge" => ComparisonOp::Ge,
            "in" => ComparisonOp::In,
            "between" => ComparisonOp::Between,
            "exists" => ComparisonOp::Exists,
            "contains" => ComparisonOp::Contains,
            "notContains" => ComparisonOp::NotContains,
            "startsWith" | "beginsWith" => ComparisonOp::StartsWith,
            "endsWith" => ComparisonOp::EndsWith,
            other => ComparisonOp::Other(other.to_string()),
        }
    }

    /// Returns the canonical operator name
    pub fn name(&self) -> &str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::In => "in",
            ComparisonOp::Between => "between",
            ComparisonOp::Exists => "exists",
            ComparisonOp::Contains => "contains",
            ComparisonOp::NotContains => "notContains",
            ComparisonOp::StartsWith => "startsWith",
            ComparisonOp::EndsWith => "endsWith",
            ComparisonOp::Other(name) => name,
        }
    }

    /// Returns true if the operator table knows this operator
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ComparisonOp::Other(_))
    }
}

/// Logical combinators joining sub-filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Parses a reserved combinator field name
    pub fn parse(name: &str) -> Option<LogicalOp> {
        match name {
            "and" => Some(LogicalOp::And),
            "or" => Some(LogicalOp::Or),
            _ => None,
        }
    }

    /// Returns the top-level key synthesized in the compiled output
    pub fn backend_key(&self) -> &'static str {
        match self {
            LogicalOp::And => "$and",
            LogicalOp::Or => "$or",
        }
    }
}

/// Predicate attached to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPredicate {
    /// Bare literal value: equality shorthand
    Literal(Value),
    /// Single-operator clause
    Clause { op: ComparisonOp, operand: Value },
}

/// One entry of a parsed filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    /// Ordinary field predicate
    Field {
        name: String,
        predicate: FieldPredicate,
    },
    /// `and`/`or` over an ordered sequence of sub-filters
    Logical {
        op: LogicalOp,
        branches: Vec<FilterExpr>,
    },
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterExpr {
    entries: Vec<FilterEntry>,
}

impl FilterExpr {
    /// Creates a filter expression from parsed entries
    pub fn new(entries: Vec<FilterEntry>) -> Self {
        Self { entries }
    }

    /// Entries in input order
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    /// True when the filter constrains nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
