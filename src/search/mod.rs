//! Field value lookup over an in-memory document collection.
//!
//! This module provides tokenization, query expression parsing and the
//! [`FieldIndex`] that answers batched field value requests.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{Document, FieldIndex};
pub use query::{Expression, FieldClause, parse_expression, strip_field_expressions};
