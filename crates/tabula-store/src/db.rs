//! Database connection management
//!
//! Connections are owned by the caller and passed to the store per call.

use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::config::StoreConfig;
use crate::errors::{db_error, Result};

const CONNECTION: &str = "<connection>";

/// Open a SQLite database at the given path with default settings
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(db_error(CONNECTION, "open"))?;
    configure(&conn, &StoreConfig::default())?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(db_error(CONNECTION, "open"))?;
    configure(&conn, &StoreConfig::in_memory())?;
    Ok(conn)
}

/// Open the database a configuration describes and apply its pragmas
pub fn open_with(config: &StoreConfig) -> Result<Connection> {
    let conn = if config.is_in_memory() {
        Connection::open_in_memory()
    } else {
        Connection::open(&config.path)
    }
    .map_err(db_error(CONNECTION, "open"))?;
    configure(&conn, config)?;
    Ok(conn)
}

/// Apply foreign-key enforcement, journal mode and busy timeout
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    let on_error = db_error(CONNECTION, "configure");

    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(&on_error)?;

    // In-memory databases report "memory" whatever mode is requested.
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", config.journal_mode.as_str(), |row| {
            row.get(0)
        })
        .map_err(&on_error)?;

    conn.busy_timeout(config.busy_timeout()).map_err(&on_error)?;

    debug!(
        foreign_keys = config.foreign_keys,
        journal_mode = %mode,
        busy_timeout_ms = config.busy_timeout_ms,
        "connection configured"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalMode;

    fn pragma_i64(conn: &Connection, name: &str) -> i64 {
        conn.pragma_query_value(None, name, |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_in_memory_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        assert_eq!(pragma_i64(&conn, "foreign_keys"), 1);
    }

    #[test]
    fn test_open_with_applies_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            path: dir.path().join("store.db"),
            foreign_keys: false,
            journal_mode: JournalMode::Wal,
            busy_timeout_ms: 250,
        };
        let conn = open_with(&config).unwrap();
        assert_eq!(pragma_i64(&conn, "foreign_keys"), 0);
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
        assert_eq!(pragma_i64(&conn, "busy_timeout"), 250);
    }
}
