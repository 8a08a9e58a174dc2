//! Dynamic filters: the request-facing filter shape, the compiled predicate
//! tree, and the compiler between them

pub mod compiler;
pub mod model;
pub mod predicate;

pub use compiler::{compile, LogicOperator};
pub use model::{SearchCondition, SearchFilter};
pub use predicate::{Condition, Operand, Operator, Predicate};
