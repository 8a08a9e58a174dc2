//! SQL rendering
//!
//! The only place that turns declarations and predicates into SQL text.
//! Every value is bound as a parameter; every identifier is validated and
//! quoted.

pub mod dialect;
pub mod ident;
pub mod render;
pub mod statement;

pub use dialect::Dialect;
pub use render::Statement;
pub use statement::{OrderBy, SortDirection};
