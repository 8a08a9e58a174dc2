use serde::{Deserialize, Serialize};

use super::compiler;
use super::predicate::Predicate;
use crate::errors::Result;

/// One `{key, operator, value}` triple as supplied by the caller
///
/// All three parts are kept as raw strings; interpretation happens in the
/// compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCondition {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

impl SearchCondition {
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Flat filter: ordered conditions joined by a single AND/OR
///
/// Deserializes from the request-body shape
/// `{"conditions": [{"key": .., "operator": .., "value": ..}], "logic": "AND"}`.
/// Both fields may be omitted; no conditions means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub conditions: Vec<SearchCondition>,
    #[serde(default)]
    pub logic: String,
}

impl SearchFilter {
    /// Empty filter with the given logic operator
    pub fn new(logic: impl Into<String>) -> Self {
        Self {
            conditions: Vec::new(),
            logic: logic.into(),
        }
    }

    pub fn and() -> Self {
        Self::new("AND")
    }

    pub fn or() -> Self {
        Self::new("OR")
    }

    /// Append a condition
    pub fn condition(
        mut self,
        key: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.conditions
            .push(SearchCondition::new(key, operator, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Compile into a predicate; `None` means no filtering
    pub fn compile(&self) -> Result<Option<Predicate>> {
        compiler::compile(self)
    }
}
