use crate::value::Value;

/// Comparison operator of a leaf condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    In,
    NotIn,
    Like,
    NotLike,
}

impl Operator {
    /// Accepted spellings, as listed in `UnsupportedOperator` messages
    pub const SUPPORTED: &'static str =
        "equal, eq, not_equal, ne, neq, in, not_in, nin, like, not_like, nlike";

    /// Resolve an operator alias (case-insensitive)
    pub fn parse(alias: &str) -> Option<Operator> {
        match alias.trim().to_ascii_lowercase().as_str() {
            "equal" | "eq" => Some(Operator::Equal),
            "not_equal" | "ne" | "neq" => Some(Operator::NotEqual),
            "in" => Some(Operator::In),
            "not_in" | "nin" => Some(Operator::NotIn),
            "like" => Some(Operator::Like),
            "not_like" | "nlike" => Some(Operator::NotLike),
            _ => None,
        }
    }

    /// SQL spelling of the operator
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }

    /// Whether the operator takes a list operand
    pub fn is_set(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

/// Right-hand side of a leaf condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

/// Leaf condition: `column <operator> operand`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub operand: Operand,
}

/// Compiled, database-agnostic filter tree
///
/// The compiler only ever produces a single leaf or one flat group of leaves;
/// rendering accepts arbitrary nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Leaf(Condition),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn leaf(column: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Predicate::Leaf(Condition {
            column: column.into(),
            operator,
            operand,
        })
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Operator::Equal, Operand::Scalar(value.into()))
    }

    /// `column IN (values..)`
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::leaf(
            column,
            Operator::In,
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Every column referenced by the tree, in order of appearance
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Leaf(c) => out.push(c.column.as_str()),
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_columns(out);
                }
            }
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ", self.column, self.operator.sql())?;
        match &self.operand {
            Operand::Scalar(v) => write!(f, "{}", v),
            Operand::List(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", items.join(", "))
            }
        }
    }
}

/// Literal rendering for logs and tests; the store binds parameters instead
impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (children, joiner) = match self {
            Predicate::Leaf(c) => return write!(f, "{}", c),
            Predicate::And(children) => (children, " AND "),
            Predicate::Or(children) => (children, " OR "),
        };
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(joiner)?;
            }
            match child {
                Predicate::Leaf(_) => write!(f, "{}", child)?,
                _ => write!(f, "({})", child)?,
            }
        }
        Ok(())
    }
}
