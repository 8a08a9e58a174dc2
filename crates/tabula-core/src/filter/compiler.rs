//! Predicate compiler
//!
//! Turns a caller-supplied `SearchFilter` into a `Predicate`. Compilation is
//! pure: no identifiers are checked against a table here and no SQL is
//! produced, so the output is safe to hand to any renderer.

use super::model::{SearchCondition, SearchFilter};
use super::predicate::{Condition, Operand, Operator, Predicate};
use crate::errors::{Result, TabulaError};
use crate::value::Value;

/// Top-level connective of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOperator {
    And,
    Or,
}

impl LogicOperator {
    /// Parse case-insensitively; only `AND` and `OR` are accepted
    pub fn parse(logic: &str) -> Result<Self> {
        match logic.to_uppercase().as_str() {
            "AND" => Ok(LogicOperator::And),
            "OR" => Ok(LogicOperator::Or),
            _ => Err(TabulaError::InvalidLogicOperator {
                logic: logic.to_string(),
            }),
        }
    }
}

/// Compile a filter
///
/// Returns `Ok(None)` for an empty condition list whatever the logic string.
/// Otherwise the logic operator is validated first, then each condition in
/// order; the first failing condition is reported by its 1-based position.
pub fn compile(filter: &SearchFilter) -> Result<Option<Predicate>> {
    if filter.conditions.is_empty() {
        return Ok(None);
    }

    let logic = LogicOperator::parse(&filter.logic)?;

    let mut leaves = filter
        .conditions
        .iter()
        .enumerate()
        .map(|(i, condition)| compile_condition(i + 1, condition).map(Predicate::Leaf))
        .collect::<Result<Vec<_>>>()?;

    let predicate = if leaves.len() == 1 {
        leaves.remove(0)
    } else {
        match logic {
            LogicOperator::And => Predicate::And(leaves),
            LogicOperator::Or => Predicate::Or(leaves),
        }
    };

    tracing::trace!(conditions = filter.conditions.len(), predicate = %predicate, "filter compiled");
    Ok(Some(predicate))
}

fn compile_condition(position: usize, condition: &SearchCondition) -> Result<Condition> {
    if condition.key.is_empty() {
        return Err(TabulaError::InvalidCondition {
            position,
            reason: "key must not be empty".to_string(),
        });
    }
    if condition.operator.is_empty() {
        return Err(TabulaError::InvalidCondition {
            position,
            reason: "operator must not be empty".to_string(),
        });
    }

    let operator =
        Operator::parse(&condition.operator).ok_or_else(|| TabulaError::UnsupportedOperator {
            position,
            operator: condition.operator.clone(),
            supported: Operator::SUPPORTED.to_string(),
        })?;

    let operand = if operator.is_set() {
        Operand::List(parse_array(position, &condition.operator, &condition.value)?)
    } else {
        if condition.value.is_empty() {
            return Err(TabulaError::InvalidCondition {
                position,
                reason: format!("value for '{}' must not be empty", condition.operator),
            });
        }
        Operand::Scalar(Value::Text(condition.value.clone()))
    };

    Ok(Condition {
        column: condition.key.clone(),
        operator,
        operand,
    })
}

fn parse_array(position: usize, operator: &str, raw: &str) -> Result<Vec<Value>> {
    let invalid = |reason: String| TabulaError::InvalidArrayValue {
        position,
        operator: operator.to_string(),
        reason,
    };

    let json: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let items = match json {
        serde_json::Value::Array(items) => items,
        other => return Err(invalid(format!("found {}", json_kind(&other)))),
    };
    if items.is_empty() {
        return Err(TabulaError::EmptyArrayValue {
            position,
            operator: operator.to_string(),
        });
    }

    items
        .iter()
        .map(|item| match Value::from_json(item) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(invalid(format!(
                "elements must be strings, numbers or booleans, found {}",
                json_kind(item)
            ))),
        })
        .collect()
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
