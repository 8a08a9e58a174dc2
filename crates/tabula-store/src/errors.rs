//! Error handling for tabula-store
//!
//! Wraps rusqlite failures into `TabulaError` with table and operation context

use rusqlite::ErrorCode;
use tabula_core::errors::TabulaError;

pub use tabula_core::errors::Result;

/// Wrap a rusqlite error with the table and operation it came from
///
/// Constraint failures (unique, foreign key, not null, check) become
/// `ConstraintViolation`; everything else becomes `Database`.
pub fn from_rusqlite(table: &str, op: &str, err: rusqlite::Error) -> TabulaError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            TabulaError::ConstraintViolation {
                table: table.to_string(),
                op: op.to_string(),
                message: err.to_string(),
            }
        }
        _ => TabulaError::Database {
            table: table.to_string(),
            op: op.to_string(),
            message: err.to_string(),
        },
    }
}

/// Closure form of [`from_rusqlite`] for `map_err`
pub fn db_error<'a>(table: &'a str, op: &'a str) -> impl Fn(rusqlite::Error) -> TabulaError + 'a {
    move |err| from_rusqlite(table, op, err)
}

/// Create an IO error
pub fn io_error(op: &str, err: std::io::Error) -> TabulaError {
    TabulaError::Io {
        op: op.to_string(),
        message: err.to_string(),
    }
}
