//! Explicit field-to-column mapping for entity records
//!
//! Each entity type lists its mapped columns once, as a static table of
//! accessor pairs. The repository reads and writes entities only through that
//! table, so it needs no per-entity SQL.

use crate::errors::Result;
use crate::value::Value;

/// One mapped field: its column name and accessor pair
///
/// `get` returns `None` when the field is unset; the repository omits unset
/// fields from inserts and updates. `set` receives `Value::Null` for NULL
/// columns.
pub struct Field<E> {
    pub column: &'static str,
    pub get: fn(&E) -> Option<Value>,
    pub set: fn(&mut E, Value) -> Result<()>,
}

impl<E> Field<E> {
    pub const fn new(
        column: &'static str,
        get: fn(&E) -> Option<Value>,
        set: fn(&mut E, Value) -> Result<()>,
    ) -> Self {
        Self { column, get, set }
    }
}

/// A plain data record whose fields map to the columns of one table
///
/// `Default` must produce a record with every field unset; rows are decoded
/// by starting from the default and setting the columns present in the row.
///
/// # Example
///
/// ```
/// use tabula_core::entity::Entity;
/// use tabula_core::entity_fields;
///
/// #[derive(Debug, Default)]
/// struct Word {
///     id: Option<i64>,
///     word: Option<String>,
/// }
///
/// impl Entity for Word {
///     const FIELDS: &'static [tabula_core::entity::Field<Self>] =
///         entity_fields!(Word { id => "id", word => "word" });
/// }
///
/// let w = Word { id: None, word: Some("apple".into()) };
/// assert_eq!(w.present_values().len(), 1);
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    /// Mapped fields, in the order they are written
    const FIELDS: &'static [Field<Self>];

    /// Mapping entry for a column, if the entity maps it
    fn field(column: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|f| f.column == column)
    }

    /// Mapped column names
    fn columns() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.column).collect()
    }

    /// Columns and values of every field that is set
    fn present_values(&self) -> Vec<(&'static str, Value)> {
        Self::FIELDS
            .iter()
            .filter_map(|f| (f.get)(self).map(|v| (f.column, v)))
            .collect()
    }

    /// Set a column's value; unmapped columns are ignored
    fn set_column(&mut self, column: &str, value: Value) -> Result<()> {
        match Self::field(column) {
            Some(field) => (field.set)(self, value),
            None => Ok(()),
        }
    }
}

/// Build an entity's field table from `field => "column"` pairs
///
/// Every listed field must be an `Option<T>` where `Value: From<T>` and `T`
/// implements `FromValue`.
#[macro_export]
macro_rules! entity_fields {
    ($entity:ty { $($field:ident => $column:literal),* $(,)? }) => {
        &[
            $(
                $crate::entity::Field::new(
                    $column,
                    |e: &$entity| e.$field.clone().map($crate::value::Value::from),
                    |e: &mut $entity, v: $crate::value::Value| {
                        e.$field = $crate::value::from_nullable($column, v)?;
                        Ok(())
                    },
                ),
            )*
        ]
    };
}
