//! Per-table DDL synthesis

use std::collections::HashSet;

use tabula_core::errors::{Result, TabulaError};
use tabula_core::schema::{Column, ColumnType, Index, TableDefinition};

use crate::sql::{ident, Dialect};

/// Statements creating one table and its indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDdl {
    pub table: String,
    pub create_table: String,
    /// Empty for dialects that declare indexes inside `CREATE TABLE`
    pub indexes: Vec<String>,
}

impl TableDdl {
    /// Every statement, table first
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.create_table.as_str()).chain(self.indexes.iter().map(String::as_str))
    }
}

fn invalid(table: &TableDefinition, reason: impl Into<String>) -> TabulaError {
    TabulaError::InvalidDefinition {
        table: table.name.clone(),
        reason: reason.into(),
    }
}

/// Declared indexes followed by one `idx_<table>_<column>` per indexed column
///
/// An implicit index is skipped when a declared index already uses its name.
pub(crate) fn effective_indexes(table: &TableDefinition) -> Vec<Index> {
    let mut indexes = table.indexes.clone();
    for column in table.columns.iter().filter(|c| c.indexed) {
        let name = format!("idx_{}_{}", table.name, column.name);
        if !indexes.iter().any(|i| i.name == name) {
            indexes.push(Index::new(name, [column.name.clone()]));
        }
    }
    indexes
}

/// Check everything about a declaration that does not depend on other tables
pub fn validate(table: &TableDefinition) -> Result<()> {
    ident::check("table", &table.name)?;

    if table.columns.is_empty() {
        return Err(invalid(table, "no columns declared"));
    }

    let mut seen = HashSet::new();
    for column in &table.columns {
        ident::check("column", &column.name)?;
        if !seen.insert(column.name.as_str()) {
            return Err(invalid(table, format!("duplicate column {}", column.name)));
        }
    }

    let primary_keys: Vec<&Column> = table.primary_key_columns().collect();
    if primary_keys.is_empty() {
        return Err(invalid(table, "no primary key column"));
    }

    for column in table.columns.iter().filter(|c| c.auto_increment) {
        if column.column_type != ColumnType::Integer {
            return Err(invalid(
                table,
                format!(
                    "auto-increment column {} must be an integer, not {}",
                    column.name,
                    column.column_type.label()
                ),
            ));
        }
        if !column.primary_key || primary_keys.len() != 1 {
            return Err(invalid(
                table,
                format!(
                    "auto-increment column {} must be the only primary key column",
                    column.name
                ),
            ));
        }
    }

    for (column, fk) in table.foreign_keys() {
        ident::check("table", &fk.table)?;
        ident::check("column", &fk.column)?;
        if fk.table == table.name && !table.has_column(&fk.column) {
            return Err(invalid(
                table,
                format!(
                    "column {} references unknown column {}.{}",
                    column.name, fk.table, fk.column
                ),
            ));
        }
    }

    for index in effective_indexes(table) {
        ident::check("index", &index.name)?;
        if index.columns.is_empty() {
            return Err(invalid(table, format!("index {} has no columns", index.name)));
        }
        for column in &index.columns {
            if !table.has_column(column) {
                return Err(TabulaError::UnknownIndexColumn {
                    table: table.name.clone(),
                    index: index.name.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    Ok(())
}

fn column_clause(dialect: Dialect, column: &Column, inline_pk: bool) -> String {
    let mut clause = format!(
        "{} {}",
        dialect.quote(&column.name),
        dialect.type_name(column.column_type)
    );
    if !column.nullable {
        clause.push_str(" NOT NULL");
    }
    if let Some(default) = column.default.as_deref().filter(|_| !column.auto_increment) {
        clause.push_str(" DEFAULT ");
        clause.push_str(default);
    }

    let primary_key = inline_pk && column.primary_key;
    match dialect {
        // SQLite only accepts AUTOINCREMENT directly after PRIMARY KEY
        Dialect::Sqlite => {
            if primary_key {
                clause.push_str(" PRIMARY KEY");
            }
            if column.auto_increment {
                clause.push(' ');
                clause.push_str(dialect.auto_increment());
            }
        }
        Dialect::Postgres | Dialect::MySql => {
            if column.auto_increment {
                clause.push(' ');
                clause.push_str(dialect.auto_increment());
            }
            if primary_key {
                clause.push_str(" PRIMARY KEY");
            }
        }
    }
    clause
}

fn quoted_list<'a>(dialect: Dialect, names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|n| dialect.quote(n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_index(dialect: Dialect, table: &str, index: &Index) -> String {
    format!(
        "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        dialect.quote(&index.name),
        dialect.quote(table),
        quoted_list(dialect, index.columns.iter().map(String::as_str))
    )
}

/// Synthesize the statements creating one table
///
/// Column clauses follow declaration order. A single primary-key column is
/// declared inline, a composite key as a table constraint. Foreign keys
/// become named table constraints.
pub fn synthesize_table(table: &TableDefinition, dialect: Dialect) -> Result<TableDdl> {
    validate(table)?;

    let primary_keys: Vec<&str> = table.primary_key_columns().map(|c| c.name.as_str()).collect();
    let inline_pk = primary_keys.len() == 1;

    let mut clauses: Vec<String> = table
        .columns
        .iter()
        .map(|c| column_clause(dialect, c, inline_pk))
        .collect();

    if !inline_pk {
        clauses.push(format!(
            "PRIMARY KEY ({})",
            quoted_list(dialect, primary_keys.iter().copied())
        ));
    }

    for (column, fk) in table.foreign_keys() {
        clauses.push(format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            dialect.quote(&format!("fk_{}_{}", table.name, column.name)),
            dialect.quote(&column.name),
            dialect.quote(&fk.table),
            dialect.quote(&fk.column)
        ));
    }

    let indexes = effective_indexes(table);
    let mut index_statements = Vec::new();
    if dialect.supports_create_index_if_not_exists() {
        index_statements = indexes
            .iter()
            .map(|i| create_index(dialect, &table.name, i))
            .collect();
    } else {
        for index in &indexes {
            clauses.push(format!(
                "{}KEY {} ({})",
                if index.unique { "UNIQUE " } else { "" },
                dialect.quote(&index.name),
                quoted_list(dialect, index.columns.iter().map(String::as_str))
            ));
        }
    }

    let create_table = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        dialect.quote(&table.name),
        clauses.join(",\n    ")
    );

    Ok(TableDdl {
        table: table.name.clone(),
        create_table,
        indexes: index_statements,
    })
}
