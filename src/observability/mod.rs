//! Observability subsystem
//!
//! Structured logging for facade operations. The compiler is pure and
//! performs no I/O, so it never logs.

mod logger;

pub use logger::{Logger, Severity};
