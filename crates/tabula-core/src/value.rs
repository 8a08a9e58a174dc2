//! Database-agnostic scalar values
//!
//! `Value` is what entities hand to the repository on writes, what the
//! predicate compiler produces from filter input, and what the store decodes
//! rows into before fields are populated.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::errors::{Result, TabulaError};

/// Storage format for timestamps, matching SQL `CURRENT_TIMESTAMP`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a JSON scalar, keeping its native type
    ///
    /// Returns `None` for arrays and objects.
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Integer(i)),
                None => n.as_f64().map(Value::Real),
            },
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Format a timestamp the way it is stored
    pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Human-readable SQL literal form, for logs and diagnostics only
///
/// Statements sent to the database always bind values as parameters.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Timestamp(ts) => write!(f, "'{}'", Value::format_timestamp(ts)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// Conversion from a stored value into an entity field type
pub trait FromValue: Sized {
    /// Name of the target type, for `TypeMismatch` messages
    const EXPECTED: &'static str;

    fn from_value(column: &str, value: Value) -> Result<Self>;
}

fn mismatch<T: FromValue>(column: &str, found: &Value) -> TabulaError {
    TabulaError::TypeMismatch {
        column: column.to_string(),
        expected: T::EXPECTED.to_string(),
        found: found.type_name().to_string(),
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Text(ref s) => s.trim().parse().map_err(|_| mismatch::<i64>(column, &value)),
            other => Err(mismatch::<i64>(column, &other)),
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        let found = value.clone();
        let wide = i64::from_value(column, value)?;
        i32::try_from(wide).map_err(|_| mismatch::<i32>(column, &found))
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "real";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Real(r) => Ok(r),
            Value::Integer(i) => Ok(i as f64),
            other => Err(mismatch::<f64>(column, &other)),
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => Err(mismatch::<bool>(column, &other)),
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Real(r) => Ok(r.to_string()),
            Value::Timestamp(ts) => Ok(Value::format_timestamp(&ts)),
            other => Err(mismatch::<String>(column, &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const EXPECTED: &'static str = "timestamp";

    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            Value::Integer(secs) => Utc
                .timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| mismatch::<DateTime<Utc>>(column, &Value::Integer(secs))),
            Value::Text(ref s) => parse_timestamp(s).ok_or_else(|| mismatch::<Self>(column, &value)),
            other => Err(mismatch::<DateTime<Utc>>(column, &other)),
        }
    }
}

/// Parse the stored format, with RFC 3339 accepted as well
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert into an optional field: `Null` becomes `None`
pub fn from_nullable<T: FromValue>(column: &str, value: Value) -> Result<Option<T>> {
    if value.is_null() {
        Ok(None)
    } else {
        T::from_value(column, value).map(Some)
    }
}
