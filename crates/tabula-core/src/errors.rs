use thiserror::Error;

/// Result type alias using TabulaError
pub type Result<T> = std::result::Result<T, TabulaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the data-access layer. Each kind maps to a stable error code that
/// can be used for programmatic error handling, testing, and external API
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Declaration
    DuplicateTable,
    TableNotFound,
    InvalidDefinition,
    UnknownIndexColumn,
    CyclicSchema,

    // Filter compilation
    InvalidLogicOperator,
    InvalidCondition,
    UnsupportedOperator,
    InvalidArrayValue,
    EmptyArrayValue,

    // Repository usage
    UnknownColumn,
    InvalidIdentifier,
    TypeMismatch,
    EmptyWrite,

    // Database
    ConstraintViolation,
    Persistence,

    // Integration/IO
    InvalidConfig,
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateTable => "ERR_DUPLICATE_TABLE",
            ExErrorKind::TableNotFound => "ERR_TABLE_NOT_FOUND",
            ExErrorKind::InvalidDefinition => "ERR_INVALID_DEFINITION",
            ExErrorKind::UnknownIndexColumn => "ERR_UNKNOWN_INDEX_COLUMN",
            ExErrorKind::CyclicSchema => "ERR_CYCLIC_SCHEMA",
            ExErrorKind::InvalidLogicOperator => "ERR_INVALID_LOGIC_OPERATOR",
            ExErrorKind::InvalidCondition => "ERR_INVALID_CONDITION",
            ExErrorKind::UnsupportedOperator => "ERR_UNSUPPORTED_OPERATOR",
            ExErrorKind::InvalidArrayValue => "ERR_INVALID_ARRAY_VALUE",
            ExErrorKind::EmptyArrayValue => "ERR_EMPTY_ARRAY_VALUE",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::InvalidIdentifier => "ERR_INVALID_IDENTIFIER",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::EmptyWrite => "ERR_EMPTY_WRITE",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional table/operation/column/position
/// context so that callers can log a failure without parsing its message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    column: Option<String>,
    position: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            column: None,
            position: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add 1-based condition position context
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the condition position, if any
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(position) = self.position {
            write!(f, " (condition: {})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Broad error category, used by hosts to pick a response class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Inconsistent table declarations; fatal at startup
    Declaration,
    /// Caller-supplied filter or column names were rejected
    Filter,
    /// Programming error in the caller (e.g. writing an entity with no fields set)
    Usage,
    /// The database rejected or failed the statement
    Database,
}

/// Comprehensive error taxonomy for Tabula operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TabulaError {
    // ===== Declaration Errors =====
    /// A table with the same name is already registered
    #[error("Table already registered: {table}")]
    DuplicateTable { table: String },

    /// No table with this name is registered
    #[error("Table not registered: {table}")]
    TableNotFound { table: String },

    /// Table declaration is structurally unusable
    #[error("Invalid definition for table {table}: {reason}")]
    InvalidDefinition { table: String, reason: String },

    /// Index names a column the table does not declare
    #[error("Index {index} on table {table} references unknown column {column}")]
    UnknownIndexColumn {
        table: String,
        index: String,
        column: String,
    },

    /// Foreign keys form a cycle, so no creation order exists
    #[error("Foreign key cycle among tables: {}", tables.join(", "))]
    CyclicSchema { tables: Vec<String> },

    // ===== Filter Errors =====
    /// Logic operator is neither AND nor OR
    #[error("Invalid logic operator '{logic}': expected AND or OR")]
    InvalidLogicOperator { logic: String },

    /// Condition is missing its key, operator, or value
    #[error("Condition {position}: {reason}")]
    InvalidCondition { position: usize, reason: String },

    /// Operator is not one of the recognized aliases
    #[error("Condition {position}: unsupported operator '{operator}' (supported: {supported})")]
    UnsupportedOperator {
        position: usize,
        operator: String,
        supported: String,
    },

    /// Value for a set operator is not a JSON array
    #[error("Condition {position}: value for '{operator}' must be a JSON array: {reason}")]
    InvalidArrayValue {
        position: usize,
        operator: String,
        reason: String,
    },

    /// Value for a set operator is an empty JSON array
    #[error("Condition {position}: value for '{operator}' must not be an empty array")]
    EmptyArrayValue { position: usize, operator: String },

    // ===== Repository Errors =====
    /// Column is not declared on the bound table
    #[error("Unknown column {column} on table {table}")]
    UnknownColumn { table: String, column: String },

    /// Name cannot be used as a SQL identifier
    #[error("Invalid {kind} identifier: {ident}")]
    InvalidIdentifier { kind: String, ident: String },

    /// Stored value cannot populate the mapped field
    #[error("Column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Insert or update with no fields set
    #[error("Nothing to write to table {table}: no fields are set")]
    EmptyWrite { table: String },

    // ===== Database Errors =====
    /// Statement violated a NOT NULL, UNIQUE, CHECK or FOREIGN KEY constraint
    #[error("Constraint violation in {op} on table {table}: {message}")]
    ConstraintViolation {
        table: String,
        op: String,
        message: String,
    },

    /// Any other database failure (connectivity, locking, I/O, SQL)
    #[error("Database error in {op} on table {table}: {message}")]
    Database {
        table: String,
        op: String,
        message: String,
    },

    // ===== Generic Errors =====
    /// Configuration value is missing or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error (config files, database paths)
    #[error("IO error in {op}: {message}")]
    Io { op: String, message: String },

    /// Serialization error (JSON/TOML encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TabulaError {
    /// Classify this error for the caller
    pub fn category(&self) -> ErrorCategory {
        match self {
            TabulaError::DuplicateTable { .. }
            | TabulaError::InvalidDefinition { .. }
            | TabulaError::UnknownIndexColumn { .. }
            | TabulaError::CyclicSchema { .. } => ErrorCategory::Declaration,

            TabulaError::InvalidLogicOperator { .. }
            | TabulaError::InvalidCondition { .. }
            | TabulaError::UnsupportedOperator { .. }
            | TabulaError::InvalidArrayValue { .. }
            | TabulaError::EmptyArrayValue { .. }
            | TabulaError::UnknownColumn { .. }
            | TabulaError::InvalidIdentifier { .. } => ErrorCategory::Filter,

            TabulaError::TableNotFound { .. }
            | TabulaError::EmptyWrite { .. }
            | TabulaError::InvalidConfig { .. }
            | TabulaError::Serialization { .. } => ErrorCategory::Usage,

            TabulaError::TypeMismatch { .. }
            | TabulaError::ConstraintViolation { .. }
            | TabulaError::Database { .. }
            | TabulaError::Io { .. } => ErrorCategory::Database,
        }
    }

    /// True when the caller's input is at fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Filter | ErrorCategory::Usage
        )
    }
}

/// Conversion from TabulaError to ExError
impl From<TabulaError> for ExError {
    fn from(err: TabulaError) -> Self {
        match err {
            TabulaError::DuplicateTable { table } => ExError::new(ExErrorKind::DuplicateTable)
                .with_op("register")
                .with_table(table)
                .with_message("Table already registered"),

            TabulaError::TableNotFound { table } => ExError::new(ExErrorKind::TableNotFound)
                .with_table(table)
                .with_message("Table not registered"),

            TabulaError::InvalidDefinition { table, reason } => {
                ExError::new(ExErrorKind::InvalidDefinition)
                    .with_op("synthesize_ddl")
                    .with_table(table)
                    .with_message(reason)
            }

            TabulaError::UnknownIndexColumn {
                table,
                index,
                column,
            } => ExError::new(ExErrorKind::UnknownIndexColumn)
                .with_op("synthesize_ddl")
                .with_table(table)
                .with_column(column)
                .with_message(format!("Index {} references an unknown column", index)),

            TabulaError::CyclicSchema { tables } => ExError::new(ExErrorKind::CyclicSchema)
                .with_op("initialize_all")
                .with_message(format!("Foreign key cycle among: {}", tables.join(", "))),

            TabulaError::InvalidLogicOperator { logic } => {
                ExError::new(ExErrorKind::InvalidLogicOperator)
                    .with_op("compile_filter")
                    .with_message(format!("Invalid logic operator '{}'", logic))
            }

            TabulaError::InvalidCondition { position, reason } => {
                ExError::new(ExErrorKind::InvalidCondition)
                    .with_op("compile_filter")
                    .with_position(position)
                    .with_message(reason)
            }

            TabulaError::UnsupportedOperator {
                position,
                operator,
                supported,
            } => ExError::new(ExErrorKind::UnsupportedOperator)
                .with_op("compile_filter")
                .with_position(position)
                .with_message(format!(
                    "Unsupported operator '{}' (supported: {})",
                    operator, supported
                )),

            TabulaError::InvalidArrayValue {
                position,
                operator,
                reason,
            } => ExError::new(ExErrorKind::InvalidArrayValue)
                .with_op("compile_filter")
                .with_position(position)
                .with_message(format!("'{}' expects a JSON array: {}", operator, reason)),

            TabulaError::EmptyArrayValue { position, operator } => {
                ExError::new(ExErrorKind::EmptyArrayValue)
                    .with_op("compile_filter")
                    .with_position(position)
                    .with_message(format!("'{}' expects a non-empty array", operator))
            }

            TabulaError::UnknownColumn { table, column } => {
                ExError::new(ExErrorKind::UnknownColumn)
                    .with_table(table)
                    .with_column(column)
                    .with_message("Column is not declared on table")
            }

            TabulaError::InvalidIdentifier { kind, ident } => {
                ExError::new(ExErrorKind::InvalidIdentifier)
                    .with_message(format!("Invalid {} identifier: {}", kind, ident))
            }

            TabulaError::TypeMismatch {
                column,
                expected,
                found,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_column(column)
                .with_message(format!("Expected {}, found {}", expected, found)),

            TabulaError::EmptyWrite { table } => ExError::new(ExErrorKind::EmptyWrite)
                .with_table(table)
                .with_message("No fields are set"),

            TabulaError::ConstraintViolation { table, op, message } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_op(op)
                    .with_table(table)
                    .with_message(message)
            }

            TabulaError::Database { table, op, message } => {
                ExError::new(ExErrorKind::Persistence)
                    .with_op(op)
                    .with_table(table)
                    .with_message(message)
            }

            TabulaError::InvalidConfig { message } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message),

            TabulaError::Io { op, message } => {
                ExError::new(ExErrorKind::Io).with_op(op).with_message(message)
            }

            TabulaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to TabulaError
impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Serialization {
            message: err.to_string(),
        }
    }
}
