//! The tabular data cursor abstraction and its in-memory implementation.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{Result, RowForgeError};
use crate::shape::{ColumnType, FieldDef};
use crate::value::Value;

/// A forward-only, single-consumer cursor over rows of named, typed columns.
///
/// Supplied by an external component (a database client or an in-memory
/// stand-in). Reading advances shared state; only one mapping operation may
/// consume a cursor at a time.
pub trait RowCursor {
    /// Advances to the next row, reporting whether one was produced.
    fn advance(&mut self) -> bool;

    /// Number of columns in the result shape.
    fn column_count(&self) -> usize;

    /// Name of the column at `ordinal`.
    fn column_name(&self, ordinal: usize) -> &str;

    /// Declared type of the column at `ordinal`.
    fn column_type(&self, ordinal: usize) -> ColumnType;

    /// Ordinal of the named column, case-sensitive, first match.
    fn ordinal(&self, name: &str) -> Option<usize>;

    /// Whether the current row holds NULL at `ordinal`.
    fn is_null(&self, ordinal: usize) -> bool;

    /// Generic accessor: the current row's value at `ordinal`.
    fn value(&self, ordinal: usize) -> Value;

    fn get_i64(&self, ordinal: usize) -> Result<i64> {
        let v = self.value(ordinal);
        v.as_i64().ok_or_else(|| typed_error(self, ordinal, ColumnType::I64, &v))
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64> {
        let v = self.value(ordinal);
        v.as_f64().ok_or_else(|| typed_error(self, ordinal, ColumnType::F64, &v))
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool> {
        let v = self.value(ordinal);
        v.as_bool().ok_or_else(|| typed_error(self, ordinal, ColumnType::Bool, &v))
    }

    fn get_str(&self, ordinal: usize) -> Result<Arc<str>> {
        match self.value(ordinal) {
            Value::String(s) => Ok(s),
            v => Err(typed_error(self, ordinal, ColumnType::String, &v)),
        }
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal> {
        let v = self.value(ordinal);
        v.as_decimal()
            .ok_or_else(|| typed_error(self, ordinal, ColumnType::Decimal, &v))
    }

    fn get_datetime(&self, ordinal: usize) -> Result<i64> {
        let v = self.value(ordinal);
        v.as_datetime()
            .ok_or_else(|| typed_error(self, ordinal, ColumnType::DateTime, &v))
    }

    fn get_date(&self, ordinal: usize) -> Result<i32> {
        let v = self.value(ordinal);
        v.as_date().ok_or_else(|| typed_error(self, ordinal, ColumnType::Date, &v))
    }
}

fn typed_error(
    cursor: &(impl RowCursor + ?Sized),
    ordinal: usize,
    expected: ColumnType,
    value: &Value,
) -> RowForgeError {
    RowForgeError::TypeMismatch {
        field: cursor.column_name(ordinal).to_string(),
        expected,
        actual: value.type_name(),
    }
}

/// In-memory cursor over pre-built rows.
///
/// The test-double and demo data source; positions before the first row until
/// the first `advance`.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    columns: Vec<FieldDef>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
}

impl MemoryCursor {
    pub fn new(columns: Vec<FieldDef>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            position: None,
        }
    }

    /// Appends a row. Panics in debug builds if the width disagrees with the
    /// column list.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    fn current(&self) -> Option<&Vec<Value>> {
        self.rows.get(self.position?)
    }
}

impl RowCursor for MemoryCursor {
    fn advance(&mut self) -> bool {
        let next = match self.position {
            None => 0,
            Some(p) => p + 1,
        };
        if next < self.rows.len() {
            self.position = Some(next);
            true
        } else {
            // Park past the end so repeated advance stays false.
            self.position = Some(self.rows.len());
            false
        }
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, ordinal: usize) -> &str {
        &self.columns[ordinal].name
    }

    fn column_type(&self, ordinal: usize) -> ColumnType {
        self.columns[ordinal].column_type
    }

    fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name.as_ref() == name)
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.current()
            .and_then(|row| row.get(ordinal))
            .map(|v| v.is_none())
            .unwrap_or(true)
    }

    fn value(&self, ordinal: usize) -> Value {
        self.current()
            .and_then(|row| row.get(ordinal))
            .cloned()
            .unwrap_or(Value::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_cursor() -> MemoryCursor {
        MemoryCursor::new(vec![
            FieldDef::new("OrderId", ColumnType::I64),
            FieldDef::new("ShipName", ColumnType::String),
        ])
        .with_row(vec![Value::I64(183), Value::from("Acme Inc.")])
    }

    #[test]
    fn test_advance_and_read() {
        let mut cursor = order_cursor();
        assert!(cursor.advance());
        assert_eq!(cursor.get_i64(0).unwrap(), 183);
        assert_eq!(cursor.get_str(1).unwrap().as_ref(), "Acme Inc.");
        assert!(!cursor.advance());
        assert!(!cursor.advance());
    }

    #[test]
    fn test_before_first_row_is_null() {
        let cursor = order_cursor();
        assert!(cursor.is_null(0));
        assert!(cursor.value(0).is_none());
    }

    #[test]
    fn test_ordinal_lookup() {
        let cursor = order_cursor();
        assert_eq!(cursor.ordinal("ShipName"), Some(1));
        assert_eq!(cursor.ordinal("shipname"), None);
        assert_eq!(cursor.ordinal("Missing"), None);
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let mut cursor = order_cursor();
        cursor.advance();
        assert!(cursor.get_i64(1).is_err());
        assert!(cursor.get_str(0).is_err());
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = MemoryCursor::new(vec![FieldDef::new("a", ColumnType::I64)]);
        assert!(!cursor.advance());
    }
}
