//! Store configuration
//!
//! Loaded from TOML, then adjusted from the environment:
//!
//! ```toml
//! path = "vocab.db"
//! foreign_keys = true
//! journal_mode = "wal"
//! busy_timeout_ms = 5000
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula_core::errors::{Result, TabulaError};

use crate::errors::io_error;

/// Environment variable overriding `path`
pub const ENV_DB_PATH: &str = "TABULA_DB_PATH";
/// Environment variable overriding `journal_mode`
pub const ENV_JOURNAL_MODE: &str = "TABULA_JOURNAL_MODE";

/// SQLite journal modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    #[default]
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            JournalMode::Delete => "delete",
            JournalMode::Truncate => "truncate",
            JournalMode::Persist => "persist",
            JournalMode::Memory => "memory",
            JournalMode::Wal => "wal",
            JournalMode::Off => "off",
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalMode {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(JournalMode::Delete),
            "truncate" => Ok(JournalMode::Truncate),
            "persist" => Ok(JournalMode::Persist),
            "memory" => Ok(JournalMode::Memory),
            "wal" => Ok(JournalMode::Wal),
            "off" => Ok(JournalMode::Off),
            other => Err(TabulaError::InvalidConfig {
                message: format!(
                    "unknown journal mode '{}' (expected delete, truncate, persist, memory, wal or off)",
                    other
                ),
            }),
        }
    }
}

/// Connection settings for the SQLite store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file; `:memory:` opens a private in-memory database
    pub path: PathBuf,
    pub foreign_keys: bool,
    pub journal_mode: JournalMode,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tabula.db"),
            foreign_keys: true,
            journal_mode: JournalMode::Wal,
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            journal_mode: JournalMode::Memory,
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TabulaError::InvalidConfig {
            message: format!("failed to parse config: {}", e),
        })
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| io_error("load_config", e))?;
        Self::from_toml_str(&content)
    }

    /// Apply `TABULA_DB_PATH` and `TABULA_JOURNAL_MODE` from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            self.path = PathBuf::from(path);
        }
        if let Some(mode) = lookup(ENV_JOURNAL_MODE) {
            self.journal_mode = mode.parse()?;
        }
        Ok(self)
    }

    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.busy_timeout_ms)
    }
}
