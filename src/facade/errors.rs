//! Facade error types

use thiserror::Error;

/// Result type for facade operations
pub type FacadeResult<T> = Result<T, FacadeError>;

/// Data-access facade errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacadeError {
    /// Invalid pagination request
    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    /// Aggregation stage the facade cannot execute
    #[error("Unsupported aggregation stage: {0}")]
    UnsupportedStage(String),

    /// Update payload that cannot be merged into documents
    #[error("Invalid update payload: {0}")]
    InvalidUpdate(String),
}
