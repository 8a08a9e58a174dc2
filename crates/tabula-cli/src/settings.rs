//! Store configuration resolution
//!
//! Precedence, lowest first: defaults, config file, `.env` and process
//! environment, `--db`.

use std::path::{Path, PathBuf};

use tabula_store::StoreConfig;

use crate::commands::CliResult;

const DEFAULT_CONFIG_FILE: &str = "tabula.toml";

pub fn resolve(config: Option<&Path>, db: Option<PathBuf>) -> CliResult<StoreConfig> {
    let base = match config {
        Some(path) => StoreConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => StoreConfig::load(DEFAULT_CONFIG_FILE)?,
        None => StoreConfig::default(),
    };

    let mut resolved = base.with_env_overrides()?;
    if let Some(db) = db {
        resolved.path = db;
    }
    Ok(resolved)
}
