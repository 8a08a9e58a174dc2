//! DML statement builders
//!
//! Each builder validates and quotes every identifier it is given; callers
//! check that identifiers belong to the table.

use tabula_core::errors::Result;
use tabula_core::filter::Predicate;
use tabula_core::value::Value;

use super::dialect::Dialect;
use super::render::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `column`, `column asc`, `column desc`, or `-column`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(column) = raw.strip_prefix('-') {
            return (!column.is_empty()).then(|| Self::desc(column));
        }
        let mut parts = raw.split_whitespace();
        let column = parts.next()?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            column: column.to_string(),
            direction,
        })
    }
}

/// Parts of a SELECT
#[derive(Debug, Clone, Copy)]
pub struct SelectParts<'a> {
    pub table: &'a str,
    pub columns: &'a [&'a str],
    pub predicate: Option<&'a Predicate>,
    pub order_by: &'a [OrderBy],
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub fn select(dialect: Dialect, parts: SelectParts<'_>) -> Result<Statement> {
    let mut stmt = Statement::new(dialect);
    stmt.push_sql("SELECT ");
    stmt.push_ident_list("column", parts.columns.iter().copied())?;
    stmt.push_sql(" FROM ");
    stmt.push_ident("table", parts.table)?;
    stmt.push_where(parts.predicate)?;

    if !parts.order_by.is_empty() {
        stmt.push_sql(" ORDER BY ");
        for (i, order) in parts.order_by.iter().enumerate() {
            if i > 0 {
                stmt.push_sql(", ");
            }
            stmt.push_ident("column", &order.column)?;
            stmt.push_sql(" ");
            stmt.push_sql(order.direction.sql());
        }
    }

    let limit = parts.limit.map(|n| dialect.clamp_row_count(n));
    let offset = parts.offset.map(|n| dialect.clamp_row_count(n));
    match (limit, offset) {
        (Some(limit), _) => stmt.push_sql(&format!(" LIMIT {limit}")),
        (None, Some(_)) => {
            if let Some(unbounded) = dialect.unbounded_limit() {
                stmt.push_sql(&format!(" LIMIT {unbounded}"));
            }
        }
        (None, None) => {}
    }
    if let Some(offset) = offset {
        stmt.push_sql(&format!(" OFFSET {offset}"));
    }
    Ok(stmt)
}

/// `INSERT`, or a default-values insert when nothing is set
pub fn insert(dialect: Dialect, table: &str, values: Vec<(&str, Value)>) -> Result<Statement> {
    let mut stmt = Statement::new(dialect);
    stmt.push_sql("INSERT INTO ");
    stmt.push_ident("table", table)?;

    if values.is_empty() {
        match dialect {
            Dialect::MySql => stmt.push_sql(" () VALUES ()"),
            Dialect::Sqlite | Dialect::Postgres => stmt.push_sql(" DEFAULT VALUES"),
        }
        return Ok(stmt);
    }

    stmt.push_sql(" (");
    stmt.push_ident_list("column", values.iter().map(|(c, _)| *c))?;
    stmt.push_sql(") VALUES (");
    for (i, (_, value)) in values.into_iter().enumerate() {
        if i > 0 {
            stmt.push_sql(", ");
        }
        stmt.push_param(value);
    }
    stmt.push_sql(")");
    Ok(stmt)
}

pub fn update(
    dialect: Dialect,
    table: &str,
    values: Vec<(&str, Value)>,
    predicate: Option<&Predicate>,
) -> Result<Statement> {
    let mut stmt = Statement::new(dialect);
    stmt.push_sql("UPDATE ");
    stmt.push_ident("table", table)?;
    stmt.push_sql(" SET ");
    for (i, (column, value)) in values.into_iter().enumerate() {
        if i > 0 {
            stmt.push_sql(", ");
        }
        stmt.push_ident("column", column)?;
        stmt.push_sql(" = ");
        stmt.push_param(value);
    }
    stmt.push_where(predicate)?;
    Ok(stmt)
}

pub fn delete(dialect: Dialect, table: &str, predicate: Option<&Predicate>) -> Result<Statement> {
    let mut stmt = Statement::new(dialect);
    stmt.push_sql("DELETE FROM ");
    stmt.push_ident("table", table)?;
    stmt.push_where(predicate)?;
    Ok(stmt)
}

pub fn count(dialect: Dialect, table: &str, predicate: Option<&Predicate>) -> Result<Statement> {
    let mut stmt = Statement::new(dialect);
    stmt.push_sql("SELECT COUNT(*) FROM ");
    stmt.push_ident("table", table)?;
    stmt.push_where(predicate)?;
    Ok(stmt)
}
