//! Foreign-key creation order

use std::collections::HashSet;
use std::sync::Arc;

use tabula_core::errors::{Result, TabulaError};
use tabula_core::schema::TableDefinition;
use tracing::warn;

/// Order tables so every table comes after the tables it references
///
/// Stable with respect to the input order: among tables whose references are
/// satisfied, the earliest is emitted first. Self-references never block a
/// table. References to tables outside `tables` are left to the database.
///
/// Fails with `CyclicSchema`, listing the tables that could not be placed,
/// when the references form a cycle.
pub fn creation_order(tables: &[Arc<TableDefinition>]) -> Result<Vec<Arc<TableDefinition>>> {
    let known: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();

    let dependencies: Vec<Vec<&str>> = tables
        .iter()
        .map(|table| {
            table
                .referenced_tables()
                .into_iter()
                .filter(|referenced| {
                    let registered = known.contains(referenced);
                    if !registered {
                        warn!(
                            table = %table.name,
                            referenced = %referenced,
                            "foreign key references an unregistered table"
                        );
                    }
                    registered
                })
                .collect()
        })
        .collect();

    let mut placed: HashSet<&str> = HashSet::new();
    let mut remaining: Vec<usize> = (0..tables.len()).collect();
    let mut ordered = Vec::with_capacity(tables.len());

    while !remaining.is_empty() {
        let ready = remaining
            .iter()
            .position(|&i| dependencies[i].iter().all(|d| placed.contains(d)));

        match ready {
            Some(pos) => {
                let i = remaining.remove(pos);
                placed.insert(tables[i].name.as_str());
                ordered.push(Arc::clone(&tables[i]));
            }
            None => {
                return Err(TabulaError::CyclicSchema {
                    tables: remaining.iter().map(|&i| tables[i].name.clone()).collect(),
                })
            }
        }
    }

    Ok(ordered)
}
