//! Binding and decoding of `Value` through rusqlite

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use tabula_core::errors::{Result, TabulaError};
use tabula_core::value::Value;

/// Borrowed `Value` bound as a statement parameter
///
/// Booleans bind as 0/1 and timestamps as `YYYY-MM-DD HH:MM:SS` text.
#[derive(Debug, Clone, Copy)]
pub struct SqlValue<'a>(pub &'a Value);

impl ToSql for SqlValue<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as Raw;

        Ok(match self.0 {
            Value::Null => ToSqlOutput::Owned(Raw::Null),
            Value::Bool(b) => ToSqlOutput::Owned(Raw::Integer(i64::from(*b))),
            Value::Integer(i) => ToSqlOutput::Owned(Raw::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(Raw::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Timestamp(ts) => ToSqlOutput::Owned(Raw::Text(Value::format_timestamp(ts))),
        })
    }
}

/// Wrap a parameter list for `params_from_iter`
pub fn bind(params: &[Value]) -> impl Iterator<Item = SqlValue<'_>> {
    params.iter().map(SqlValue)
}

/// Decode one column of a result row
pub fn decode(column: &str, raw: ValueRef<'_>) -> Result<Value> {
    match raw {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(r) => Ok(Value::Real(r)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|_| TabulaError::TypeMismatch {
                column: column.to_string(),
                expected: "utf-8 text".to_string(),
                found: "invalid utf-8".to_string(),
            }),
        ValueRef::Blob(_) => Err(TabulaError::TypeMismatch {
            column: column.to_string(),
            expected: "scalar".to_string(),
            found: "blob".to_string(),
        }),
    }
}
