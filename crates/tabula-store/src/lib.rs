//! Tabula Store - SQLite binding for the data-access layer
//!
//! Provides:
//! - Connection helpers and TOML/environment configuration
//! - Dialect-aware SQL rendering with bound parameters
//! - DDL synthesis and the table initializer
//! - The generic repository (`Peer`)

pub mod config;
pub mod db;
pub mod ddl;
pub mod errors;
pub mod peer;
pub mod sql;
pub mod value;

// Re-export key types
pub use config::{JournalMode, StoreConfig};
pub use ddl::{initialize_all, plan, InitReport, SchemaPlan};
pub use errors::Result;
pub use peer::{Peer, Select};
pub use sql::{Dialect, OrderBy, SortDirection};
