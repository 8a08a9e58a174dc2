use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::table::TableDefinition;
use crate::errors::{Result, TabulaError};

#[derive(Debug, Default)]
struct Catalogue {
    order: Vec<Arc<TableDefinition>>,
    by_name: HashMap<String, usize>,
}

/// Catalogue of table declarations, keyed by table name
///
/// Thread-safe via an interior `RwLock`: registrations are serialized and a
/// reader never observes a half-inserted definition. The registry performs no
/// column or index validation, so related tables may be registered in any
/// order. Share it as `Arc<SchemaRegistry>` between the initializer and every
/// repository.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    inner: RwLock<Catalogue>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table declaration
    ///
    /// # Errors
    ///
    /// `DuplicateTable` if the name is already registered, `InvalidDefinition`
    /// if the name is empty.
    pub fn register(&self, table: TableDefinition) -> Result<()> {
        if table.name.trim().is_empty() {
            return Err(TabulaError::InvalidDefinition {
                table: table.name,
                reason: "table name must not be empty".to_string(),
            });
        }

        let mut catalogue = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if catalogue.by_name.contains_key(&table.name) {
            return Err(TabulaError::DuplicateTable { table: table.name });
        }

        tracing::debug!(table = %table.name, columns = table.columns.len(), "table registered");
        let position = catalogue.order.len();
        catalogue.by_name.insert(table.name.clone(), position);
        catalogue.order.push(Arc::new(table));
        Ok(())
    }

    /// Look up a declaration by name
    pub fn get(&self, name: &str) -> Option<Arc<TableDefinition>> {
        let catalogue = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        catalogue
            .by_name
            .get(name)
            .map(|&position| catalogue.order[position].clone())
    }

    /// Look up a declaration by name, failing with `TableNotFound`
    pub fn require(&self, name: &str) -> Result<Arc<TableDefinition>> {
        self.get(name).ok_or_else(|| TabulaError::TableNotFound {
            table: name.to_string(),
        })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_name
            .contains_key(name)
    }

    /// Registered declarations in registration order
    ///
    /// The iterator walks a snapshot taken when `all` is called; it holds no
    /// lock and does not see later registrations.
    pub fn all(&self) -> impl Iterator<Item = Arc<TableDefinition>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
            .into_iter()
    }

    /// Registered table names in registration order
    pub fn names(&self) -> Vec<String> {
        self.all().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every declaration
    pub fn clear(&self) {
        let mut catalogue = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        catalogue.order.clear();
        catalogue.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table::Column;

    fn table(name: &str) -> TableDefinition {
        TableDefinition::new(name).column(Column::integer("id").primary_key())
    }

    #[test]
    fn test_register_then_get() {
        let registry = SchemaRegistry::new();
        registry.register(table("words")).unwrap();

        let got = registry.get("words").expect("registered");
        assert_eq!(*got, table("words"));
        assert!(registry.exists("words"));
        assert!(!registry.exists("questions"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = SchemaRegistry::new();
        registry.register(table("words")).unwrap();

        let err = registry.register(table("words")).unwrap_err();
        assert_eq!(
            err,
            TabulaError::DuplicateTable {
                table: "words".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = SchemaRegistry::new();
        let err = registry.register(table("  ")).unwrap_err();
        assert!(matches!(err, TabulaError::InvalidDefinition { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let registry = SchemaRegistry::new();
        for name in ["word_definitions", "words", "questions"] {
            registry.register(table(name)).unwrap();
        }
        assert_eq!(
            registry.names(),
            vec!["word_definitions", "words", "questions"]
        );
    }

    #[test]
    fn test_all_is_a_snapshot() {
        let registry = SchemaRegistry::new();
        registry.register(table("words")).unwrap();

        let mut iter = registry.all();
        registry.register(table("questions")).unwrap();

        assert_eq!(iter.next().map(|t| t.name.clone()), Some("words".to_string()));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_clear_allows_reregistration() {
        let registry = SchemaRegistry::new();
        registry.register(table("words")).unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.get("words").is_none());
        registry.register(table("words")).unwrap();
    }

    #[test]
    fn test_require_reports_missing_table() {
        let registry = SchemaRegistry::new();
        let err = registry.require("words").unwrap_err();
        assert_eq!(
            err,
            TabulaError::TableNotFound {
                table: "words".to_string()
            }
        );
    }

    #[test]
    fn test_concurrent_registration_keeps_every_table() {
        let registry = Arc::new(SchemaRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.register(table(&format!("t{}", i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(registry.len(), 8);
    }
}
