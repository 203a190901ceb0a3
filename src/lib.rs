//! docsieve - Declarative filter compiler and data-access facade for
//! document stores
//!
//! The compiler translates API-facing filter expressions into
//! backend-native `$`-tagged filter documents; the facade consumes those
//! documents to find, count, aggregate, update, and delete stored
//! documents.

pub mod compiler;
pub mod facade;
pub mod observability;
