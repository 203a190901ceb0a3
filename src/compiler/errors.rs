//! Compiler error types
//!
//! Lenient compilation never fails; these errors surface only when the
//! compiler runs in strict mode.

use thiserror::Error;

/// Result type for compile operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Compiler errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Operator name not present in the operator table
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),
}
