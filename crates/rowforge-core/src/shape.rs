//! Shape definition types: the ordered, named, typed fields of a destination.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    I64,
    F64,
    String,
    Bool,
    Decimal,
    // DateTime stored as Unix timestamp in milliseconds.
    DateTime,
    // Date stored as days since Unix epoch.
    Date,
}

/// A statically declared column: name and type known at compile time.
///
/// Generated per destination struct by `#[derive(RowShaped)]`; the index of a
/// `Column` within the table doubles as the accessor index passed to
/// [`crate::RowShaped::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// A runtime-defined field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub column_type: ColumnType,
}

impl FieldDef {
    pub fn new(name: impl Into<Arc<str>>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A runtime type descriptor: an ordered set of named, typed fields.
///
/// Shapes are immutable after construction; every compiled artifact keyed by a
/// shape assumes it never changes.
#[derive(Debug, Clone)]
pub struct Shape {
    pub name: Arc<str>,
    pub fields: Vec<FieldDef>,
}

impl Shape {
    pub fn new(name: impl Into<Arc<str>>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Builds the runtime shape of a statically declared destination type.
    pub fn of<T: crate::RowShaped>() -> Self {
        Self::new(
            T::SHAPE_NAME,
            T::columns()
                .iter()
                .map(|c| FieldDef::new(c.name, c.column_type))
                .collect(),
        )
    }

    /// Exact-name lookup. Duplicate names resolve to the first match.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.as_ref() == name)
    }

    /// Case-insensitive lookup. Duplicate names resolve to the first match.
    pub fn field_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def() {
        let field = FieldDef::new("order_id", ColumnType::I64);
        assert_eq!(field.name.as_ref(), "order_id");
        assert_eq!(field.column_type, ColumnType::I64);
    }

    #[test]
    fn test_shape_lookup() {
        let shape = Shape::new(
            "Order",
            vec![
                FieldDef::new("OrderId", ColumnType::I64),
                FieldDef::new("ShipName", ColumnType::String),
            ],
        );
        assert_eq!(shape.name.as_ref(), "Order");
        assert_eq!(shape.field_index("OrderId"), Some(0));
        assert_eq!(shape.field_index("orderid"), None);
        assert_eq!(shape.field_index_ignore_case("ORDERID"), Some(0));
        assert_eq!(shape.field_index_ignore_case("shipname"), Some(1));
        assert_eq!(shape.field_index_ignore_case("Freight"), None);
    }

    #[test]
    fn test_duplicate_names_first_match() {
        let shape = Shape::new(
            "Dup",
            vec![
                FieldDef::new("a", ColumnType::I64),
                FieldDef::new("A", ColumnType::String),
            ],
        );
        assert_eq!(shape.field_index_ignore_case("a"), Some(0));
    }
}
