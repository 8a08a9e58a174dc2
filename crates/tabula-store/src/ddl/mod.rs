//! DDL synthesis and table initialization
//!
//! Table declarations are turned into idempotent `CREATE ... IF NOT EXISTS`
//! statements, ordered so that referenced tables are created first.

pub mod initializer;
pub mod order;
pub mod synth;

pub use initializer::{initialize_all, plan, InitReport, SchemaPlan};
pub use order::creation_order;
pub use synth::{synthesize_table, TableDdl};
