//! Init command
//!
//! Usage: tabula init

use tabula_store::{db, initialize_all, StoreConfig};

use super::CliResult;
use crate::vocab;

pub fn execute(config: &StoreConfig) -> CliResult<()> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !config.is_in_memory() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let registry = vocab::registry()?;
    let mut conn = db::open_with(config)?;
    let report = initialize_all(&mut conn, &registry)?;

    println!(
        "✓ Initialized {} ({} tables, {} statements)",
        config.path.display(),
        report.tables.len(),
        report.statements
    );
    for table in &report.tables {
        println!("  {}", table);
    }
    Ok(())
}
