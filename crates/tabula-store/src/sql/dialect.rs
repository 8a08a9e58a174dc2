use tabula_core::schema::ColumnType;

/// Target SQL dialect
///
/// SQLite is the dialect the store executes; the others are rendered for
/// callers who run the statements themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `?` placeholders, `"` quoting, `AUTOINCREMENT`
    #[default]
    Sqlite,
    /// `$1, $2, ...` placeholders, `"` quoting, identity columns
    Postgres,
    /// `?` placeholders, backtick quoting, `AUTO_INCREMENT`
    MySql,
}

impl Dialect {
    /// Placeholder for the 1-based parameter `index`
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }

    /// Quote an already-validated identifier
    pub fn quote(self, ident: &str) -> String {
        let q = self.quote_char();
        format!("{q}{ident}{q}")
    }

    /// Native type name for a portable column type
    pub fn type_name(self, column_type: ColumnType) -> String {
        match (self, column_type) {
            (Dialect::Sqlite, ColumnType::Integer) => "INTEGER".to_string(),
            (Dialect::Postgres | Dialect::MySql, ColumnType::Integer) => "BIGINT".to_string(),
            (_, ColumnType::Varchar { length }) => format!("VARCHAR({length})"),
            (_, ColumnType::Text) => "TEXT".to_string(),
            (Dialect::Postgres, ColumnType::Timestamp) => "TIMESTAMP".to_string(),
            (Dialect::Sqlite | Dialect::MySql, ColumnType::Timestamp) => "DATETIME".to_string(),
        }
    }

    /// Column modifier making an integer column generate its own values
    pub fn auto_increment(self) -> &'static str {
        match self {
            Dialect::Sqlite => "AUTOINCREMENT",
            Dialect::Postgres => "GENERATED BY DEFAULT AS IDENTITY",
            Dialect::MySql => "AUTO_INCREMENT",
        }
    }

    /// Whether `CREATE INDEX IF NOT EXISTS` is available; otherwise indexes
    /// are declared inside `CREATE TABLE`
    pub fn supports_create_index_if_not_exists(self) -> bool {
        !matches!(self, Dialect::MySql)
    }

    /// Largest LIMIT/OFFSET the dialect accepts as an integer literal
    ///
    /// SQLite and PostgreSQL integers are signed 64-bit; MySQL takes the
    /// full unsigned range.
    pub fn clamp_row_count(self, n: u64) -> u64 {
        match self {
            Dialect::MySql => n,
            Dialect::Sqlite | Dialect::Postgres => n.min(i64::MAX as u64),
        }
    }

    /// LIMIT value meaning "no limit", for dialects that need one before OFFSET
    pub fn unbounded_limit(self) -> Option<&'static str> {
        match self {
            Dialect::Sqlite => Some("-1"),
            Dialect::MySql => Some("18446744073709551615"),
            Dialect::Postgres => None,
        }
    }
}
