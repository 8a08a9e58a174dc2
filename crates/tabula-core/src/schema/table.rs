use serde::{Deserialize, Serialize};

/// Portable column type vocabulary
///
/// This is the complete set of types a table declaration can use; each
/// dialect maps them to its own type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// Variable-length string with an explicit maximum length
    Varchar { length: u32 },
    /// Unbounded text
    Text,
    /// Point in time, stored as UTC
    Timestamp,
}

impl ColumnType {
    /// Short name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Varchar { .. } => "varchar",
            ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

/// Reference from a column to a column of another (or the same) table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Column declaration
///
/// Columns are nullable unless marked otherwise; a primary-key column is
/// always NOT NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub auto_increment: bool,
    pub primary_key: bool,
    /// Raw default expression, emitted verbatim (e.g. `0`, `'new'`, `CURRENT_TIMESTAMP`)
    pub default: Option<String>,
    /// Create a single-column index named `idx_<table>_<column>`
    pub indexed: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Create a nullable column with no modifiers
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            auto_increment: false,
            primary_key: false,
            default: None,
            indexed: false,
            foreign_key: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn varchar(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, ColumnType::Varchar { length })
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Timestamp)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

/// Secondary index declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Index {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Data description of one table: columns in declared order, indexes and a
/// free-text description
///
/// A declaration is built once, registered, and never mutated afterwards.
/// Consistency between columns and indexes is checked when DDL is
/// synthesized, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub description: String,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            description: String::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Look up a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Columns carrying a foreign key, with their reference
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c, fk)))
    }

    /// Distinct tables this one references, excluding itself, in column order
    pub fn referenced_tables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (_, fk) in self.foreign_keys() {
            if fk.table != self.name && !out.contains(&fk.table.as_str()) {
                out.push(fk.table.as_str());
            }
        }
        out
    }
}
