use tabula_core::errors::Result;
use tabula_core::filter::{Condition, Operand, Predicate};
use tabula_core::value::Value;

use super::dialect::Dialect;
use super::ident;

/// SQL text plus the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
    dialect: Dialect,
}

impl Statement {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Validate, quote and append an identifier
    pub fn push_ident(&mut self, kind: &str, name: &str) -> Result<()> {
        ident::check(kind, name)?;
        let quoted = self.dialect.quote(name);
        self.sql.push_str(&quoted);
        Ok(())
    }

    /// Append a comma-separated list of quoted identifiers
    pub fn push_ident_list<'a, I>(&mut self, kind: &str, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_ident(kind, name)?;
        }
        Ok(())
    }

    /// Bind a value and append its placeholder
    pub fn push_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }

    /// Append ` WHERE <predicate>` if there is one
    pub fn push_where(&mut self, predicate: Option<&Predicate>) -> Result<()> {
        if let Some(predicate) = predicate {
            self.sql.push_str(" WHERE ");
            self.push_predicate(predicate)?;
        }
        Ok(())
    }

    /// Render a predicate tree, binding every operand
    pub fn push_predicate(&mut self, predicate: &Predicate) -> Result<()> {
        let (children, joiner, empty) = match predicate {
            Predicate::Leaf(condition) => return self.push_condition(condition),
            Predicate::And(children) => (children, " AND ", "1 = 1"),
            Predicate::Or(children) => (children, " OR ", "1 = 0"),
        };
        if children.is_empty() {
            self.sql.push_str(empty);
            return Ok(());
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(joiner);
            }
            match child {
                Predicate::Leaf(condition) => self.push_condition(condition)?,
                group => {
                    self.sql.push('(');
                    self.push_predicate(group)?;
                    self.sql.push(')');
                }
            }
        }
        Ok(())
    }

    fn push_condition(&mut self, condition: &Condition) -> Result<()> {
        self.push_ident("column", &condition.column)?;
        self.sql.push(' ');
        self.sql.push_str(condition.operator.sql());
        self.sql.push(' ');
        match &condition.operand {
            Operand::Scalar(value) => self.push_param(value.clone()),
            Operand::List(values) => {
                self.sql.push('(');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_param(value.clone());
                }
                self.sql.push(')');
            }
        }
        Ok(())
    }
}
