//! Records: instances of runtime-defined shapes.

use crate::shape::Shape;
use crate::value::Value;

/// An instance of a runtime [`Shape`]: positional field values.
///
/// A freshly constructed record holds `Value::None` in every slot; that is the
/// declared default for dynamic shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Field values in order matching the shape definition.
    pub fields: Vec<Value>,
}

impl Record {
    /// Creates a record with the given field values.
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Creates a default-initialized record for a shape.
    pub fn with_defaults(shape: &Shape) -> Self {
        Self {
            fields: vec![Value::None; shape.len()],
        }
    }

    /// Gets a field value by index.
    pub fn get(&self, field_idx: usize) -> Option<&Value> {
        self.fields.get(field_idx)
    }

    /// Sets a field value by index.
    pub fn set(&mut self, field_idx: usize, value: Value) {
        if field_idx < self.fields.len() {
            self.fields[field_idx] = value;
        }
    }
}
