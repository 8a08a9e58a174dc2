//! Table initializer
//!
//! Builds the full plan for a registry before touching the database, then
//! executes it in one transaction. Re-running against an initialized database
//! is a no-op: every statement is `IF NOT EXISTS` and existing tables are
//! never diffed.

use std::time::Instant;

use rusqlite::Connection;
use tabula_core::errors::{Result, TabulaError};
use tabula_core::schema::SchemaRegistry;
use tabula_core::{log_op_end, log_op_error, log_op_start};

use super::order::creation_order;
use super::synth::{synthesize_table, TableDdl};
use crate::errors::db_error;
use crate::sql::Dialect;

/// Ordered DDL for every registered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPlan {
    pub dialect: Dialect,
    pub tables: Vec<TableDdl>,
}

impl SchemaPlan {
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().flat_map(TableDdl::statements)
    }

    pub fn statement_count(&self) -> usize {
        self.statements().count()
    }

    /// The whole plan as one script, statements terminated by `;`
    pub fn to_sql(&self) -> String {
        self.statements()
            .map(|s| format!("{};\n", s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of `initialize_all`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Tables in the order they were created
    pub tables: Vec<String>,
    pub statements: usize,
}

/// Validate, order and synthesize every registered table
pub fn plan(registry: &SchemaRegistry, dialect: Dialect) -> Result<SchemaPlan> {
    let tables: Vec<_> = registry.all().collect();

    // Foreign keys into registered tables must name a declared column
    for table in &tables {
        for (column, fk) in table.foreign_keys() {
            if let Some(target) = registry.get(&fk.table) {
                if !target.has_column(&fk.column) {
                    return Err(TabulaError::InvalidDefinition {
                        table: table.name.clone(),
                        reason: format!(
                            "column {} references unknown column {}.{}",
                            column.name, fk.table, fk.column
                        ),
                    });
                }
            }
        }
    }

    let ordered = creation_order(&tables)?;
    let tables = ordered
        .iter()
        .map(|t| synthesize_table(t, dialect))
        .collect::<Result<Vec<_>>>()?;

    Ok(SchemaPlan { dialect, tables })
}

/// Create every registered table and index that does not exist yet
///
/// Declaration errors are reported before any statement runs. A database
/// failure rolls the whole initialization back.
pub fn initialize_all(conn: &mut Connection, registry: &SchemaRegistry) -> Result<InitReport> {
    let start = Instant::now();
    log_op_start!("initialize_all", table_count = registry.len());

    let result = run(conn, registry);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "initialize_all",
                duration_ms = duration_ms,
                statement_count = report.statements
            );
        }
        Err(err) => {
            log_op_error!("initialize_all", err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn run(conn: &mut Connection, registry: &SchemaRegistry) -> Result<InitReport> {
    let plan = plan(registry, Dialect::Sqlite)?;

    let tx = conn
        .transaction()
        .map_err(db_error("<schema>", "initialize_all"))?;
    for table in &plan.tables {
        for statement in table.statements() {
            tracing::debug!(table = %table.table, sql = statement, "executing ddl");
            tx.execute_batch(statement)
                .map_err(db_error(&table.table, "initialize_all"))?;
        }
    }
    tx.commit().map_err(db_error("<schema>", "initialize_all"))?;

    Ok(InitReport {
        tables: plan.tables.iter().map(|t| t.table.clone()).collect(),
        statements: plan.statement_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::schema::{Column, TableDefinition};

    fn registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry
            .register(
                TableDefinition::new("word_definitions")
                    .column(Column::integer("id").primary_key().auto_increment())
                    .column(Column::integer("word_id").not_null().references("words", "id"))
                    .column(Column::text("definition")),
            )
            .unwrap();
        registry
            .register(
                TableDefinition::new("words")
                    .column(Column::integer("id").primary_key().auto_increment())
                    .column(Column::varchar("word", 64).not_null().indexed()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_plan_orders_referenced_tables_first() {
        let plan = plan(&registry(), Dialect::Sqlite).unwrap();
        let tables: Vec<&str> = plan.tables.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(tables, vec!["words", "word_definitions"]);
        assert_eq!(plan.statement_count(), 3);
        assert!(plan.to_sql().ends_with(";\n"));
    }

    #[test]
    fn test_plan_rejects_fk_to_undeclared_column() {
        let registry = registry();
        registry
            .register(
                TableDefinition::new("questions")
                    .column(Column::integer("id").primary_key())
                    .column(Column::integer("word_ref").references("words", "uuid")),
            )
            .unwrap();
        let err = plan(&registry, Dialect::Sqlite).unwrap_err();
        assert!(matches!(err, TabulaError::InvalidDefinition { ref table, .. } if table == "questions"));
    }

    #[test]
    fn test_initialize_all_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        let report = initialize_all(&mut conn, &registry()).unwrap();
        assert_eq!(report.tables, vec!["words", "word_definitions"]);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('words', 'word_definitions')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
