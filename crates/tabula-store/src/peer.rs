//! Generic repository
//!
//! A `Peer` binds one entity type to one registered table and runs the five
//! uniform operations against a caller-owned connection. Filters are compiled
//! and every column name is checked against the table before any statement
//! reaches the database.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use rusqlite::{params_from_iter, Connection};
use tabula_core::entity::Entity;
use tabula_core::errors::{Result, TabulaError};
use tabula_core::filter::{Predicate, SearchFilter};
use tabula_core::schema::{SchemaRegistry, TableDefinition};
use tabula_core::{log_op_end, log_op_error, log_op_start};
use tracing::warn;

use crate::errors::db_error;
use crate::sql::statement::{self, SelectParts};
use crate::sql::{Dialect, OrderBy, Statement};
use crate::value::{bind, decode};

/// Options for [`Peer::select`]
///
/// The default selects every column of every row in database order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    /// `None` or an empty list selects all declared columns
    pub columns: Option<Vec<String>>,
    pub filter: SearchFilter,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Uniform CRUD over one table for entity type `E`
pub struct Peer<E: Entity> {
    table: Arc<TableDefinition>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Peer<E> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for Peer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("table", &self.table.name)
            .field("entity", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: Entity> Peer<E> {
    /// Bind to a registered table
    ///
    /// Fails with `TableNotFound` if the table is not registered, or
    /// `UnknownColumn` if the entity maps a column the table does not declare.
    pub fn new(registry: &SchemaRegistry, table: &str) -> Result<Self> {
        Self::from_definition(registry.require(table)?)
    }

    pub fn from_definition(table: Arc<TableDefinition>) -> Result<Self> {
        for column in E::columns() {
            if !table.has_column(column) {
                return Err(TabulaError::UnknownColumn {
                    table: table.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(Self {
            table,
            _entity: PhantomData,
        })
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    /// Rows matching `query`, decoded into entities
    ///
    /// Row columns the entity does not map are ignored; mapped fields whose
    /// column was not selected stay unset.
    pub fn select(&self, conn: &Connection, query: &Select) -> Result<Vec<E>> {
        self.observe("select", Vec::len, || {
            let predicate = self.compile(&query.filter)?;
            let columns: Vec<&str> = match &query.columns {
                Some(columns) if !columns.is_empty() => {
                    for column in columns {
                        self.check_column(column)?;
                    }
                    columns.iter().map(String::as_str).collect()
                }
                _ => self.table.column_names().collect(),
            };
            for order in &query.order_by {
                self.check_column(&order.column)?;
            }

            let stmt = statement::select(
                Dialect::Sqlite,
                SelectParts {
                    table: self.table_name(),
                    columns: &columns,
                    predicate: predicate.as_ref(),
                    order_by: &query.order_by,
                    limit: query.limit,
                    offset: query.offset,
                },
            )?;
            self.query(conn, &stmt)
        })
    }

    /// First row matching `filter`, in database order
    pub fn find_one(&self, conn: &Connection, filter: &SearchFilter) -> Result<Option<E>> {
        let query = Select::new().filter(filter.clone()).limit(1);
        Ok(self.select(conn, &query)?.into_iter().next())
    }

    /// Insert the set fields of `entity` and return the generated row id
    ///
    /// Unset fields are omitted so column defaults apply; set fields are
    /// written even when they hold a zero value.
    pub fn insert(&self, conn: &Connection, entity: &E) -> Result<i64> {
        self.observe("insert", |_| 1, || {
            let stmt = statement::insert(Dialect::Sqlite, self.table_name(), entity.present_values())?;
            self.execute(conn, "insert", &stmt)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Write the set fields of `entity` to every row matching `filter`
    ///
    /// An empty filter matches every row.
    pub fn update(&self, conn: &Connection, entity: &E, filter: &SearchFilter) -> Result<usize> {
        self.observe("update", |n| *n, || {
            let values = entity.present_values();
            if values.is_empty() {
                return Err(TabulaError::EmptyWrite {
                    table: self.table.name.clone(),
                });
            }
            let predicate = self.compile(filter)?;
            if predicate.is_none() {
                warn!(table = %self.table.name, "update without filter affects every row");
            }
            let stmt = statement::update(Dialect::Sqlite, self.table_name(), values, predicate.as_ref())?;
            self.execute(conn, "update", &stmt)
        })
    }

    /// Update every row
    pub fn update_all(&self, conn: &Connection, entity: &E) -> Result<usize> {
        self.update(conn, entity, &SearchFilter::default())
    }

    /// Delete every row matching `filter`; an empty filter matches every row
    pub fn delete(&self, conn: &Connection, filter: &SearchFilter) -> Result<usize> {
        self.observe("delete", |n| *n, || {
            let predicate = self.compile(filter)?;
            if predicate.is_none() {
                warn!(table = %self.table.name, "delete without filter affects every row");
            }
            let stmt = statement::delete(Dialect::Sqlite, self.table_name(), predicate.as_ref())?;
            self.execute(conn, "delete", &stmt)
        })
    }

    /// Delete every row
    pub fn delete_all(&self, conn: &Connection) -> Result<usize> {
        self.delete(conn, &SearchFilter::default())
    }

    /// Number of rows matching `filter`, or of all rows
    pub fn count(&self, conn: &Connection, filter: Option<&SearchFilter>) -> Result<u64> {
        self.observe("count", |n| *n as usize, || {
            let predicate = match filter {
                Some(filter) => self.compile(filter)?,
                None => None,
            };
            let stmt = statement::count(Dialect::Sqlite, self.table_name(), predicate.as_ref())?;
            let count: i64 = conn
                .query_row(&stmt.sql, params_from_iter(bind(&stmt.params)), |row| row.get(0))
                .map_err(db_error(self.table_name(), "count"))?;
            Ok(count.max(0) as u64)
        })
    }

    /// Whether any row matches `filter`
    pub fn exists(&self, conn: &Connection, filter: &SearchFilter) -> Result<bool> {
        Ok(self.count(conn, Some(filter))? > 0)
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if self.table.has_column(column) {
            Ok(())
        } else {
            Err(TabulaError::UnknownColumn {
                table: self.table.name.clone(),
                column: column.to_string(),
            })
        }
    }

    /// Compile a filter and check that it only names declared columns
    fn compile(&self, filter: &SearchFilter) -> Result<Option<Predicate>> {
        let predicate = filter.compile()?;
        if let Some(predicate) = &predicate {
            for column in predicate.columns() {
                self.check_column(column)?;
            }
        }
        Ok(predicate)
    }

    fn execute(&self, conn: &Connection, op: &str, stmt: &Statement) -> Result<usize> {
        conn.execute(&stmt.sql, params_from_iter(bind(&stmt.params)))
            .map_err(db_error(self.table_name(), op))
    }

    fn query(&self, conn: &Connection, stmt: &Statement) -> Result<Vec<E>> {
        let on_error = db_error(self.table_name(), "select");

        let mut prepared = conn.prepare(&stmt.sql).map_err(&on_error)?;
        let names: Vec<String> = prepared.column_names().into_iter().map(String::from).collect();
        let mut rows = prepared
            .query(params_from_iter(bind(&stmt.params)))
            .map_err(&on_error)?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next().map_err(&on_error)? {
            let mut entity = E::default();
            for (i, name) in names.iter().enumerate() {
                if E::field(name).is_none() {
                    continue;
                }
                let raw = row.get_ref(i).map_err(&on_error)?;
                entity.set_column(name, decode(name, raw)?)?;
            }
            entities.push(entity);
        }
        Ok(entities)
    }

    /// Run an operation between start and end/error log events
    fn observe<T, R, F>(&self, op: &'static str, rows: R, f: F) -> Result<T>
    where
        R: Fn(&T) -> usize,
        F: FnOnce() -> Result<T>,
    {
        let start = Instant::now();
        log_op_start!(op, table = %self.table.name);

        let result = f();
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(value) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    table = %self.table.name,
                    rows = rows(value)
                );
            }
            Err(err) => {
                log_op_error!(op, err.clone(), duration_ms = duration_ms, table = %self.table.name);
            }
        }
        result
    }
}
