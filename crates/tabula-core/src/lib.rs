//! Tabula Core - schema declarations, entity mapping, and filter compilation
//!
//! This crate holds everything in the data-access layer that does not touch a
//! database connection:
//! - Table declarations and the schema registry
//! - Database-agnostic values and explicit entity field mapping
//! - The search filter model and its predicate compiler
//! - The error and logging facilities shared with the store

pub mod entity;
pub mod errors;
pub mod filter;
pub mod logging_facility;
pub mod schema;
pub mod value;

#[doc(hidden)]
pub use tabula_core_types;

// Re-export commonly used types
pub use entity::{Entity, Field};
pub use errors::{ErrorCategory, ExError, ExErrorKind, Result, TabulaError};
pub use filter::{Predicate, SearchCondition, SearchFilter};
pub use schema::{Column, ColumnType, ForeignKey, Index, SchemaRegistry, TableDefinition};
pub use value::Value;
