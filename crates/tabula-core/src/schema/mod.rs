//! Table declarations and the registry that catalogues them

pub mod registry;
pub mod table;

pub use registry::SchemaRegistry;
pub use table::{Column, ColumnType, ForeignKey, Index, TableDefinition};
