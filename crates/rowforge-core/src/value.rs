//! Runtime values carried between cursors and destination fields.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::shape::ColumnType;

/// A runtime value read from a cursor column or held in a record field.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value (NULL column, unset field).
    None,
    /// 64-bit signed integer.
    I64(i64),
    /// 64-bit floating point.
    F64(f64),
    /// String value.
    String(Arc<str>),
    /// Boolean value.
    Bool(bool),
    /// Fixed-point decimal.
    Decimal(Decimal),
    /// DateTime as Unix timestamp in milliseconds.
    DateTime(i64),
    /// Date as days since Unix epoch.
    Date(i32),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => {
                (a - b).abs() < f64::EPSILON || (a.is_nan() && b.is_nan())
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::I64(v) => v.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Decimal(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
        }
    }
}

impl Value {
    /// Returns true if this value is None.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Attempts to extract an i64 value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            Value::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Attempts to extract a bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a decimal value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(v) => Some(*v),
            Value::I64(v) => Some(Decimal::from(*v)),
            _ => None,
        }
    }

    /// Attempts to extract a datetime (milliseconds since epoch).
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Value::DateTime(v) => Some(*v),
            Value::I64(v) => Some(*v), // Allow i64 to be treated as datetime
            _ => None,
        }
    }

    /// Attempts to extract a date (days since epoch). An i64 narrows only
    /// when it fits; out-of-range day counts read as a mismatch.
    pub fn as_date(&self) -> Option<i32> {
        match self {
            Value::Date(v) => Some(*v),
            Value::I64(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The declared type this value inhabits, or None for an absent value.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::None => None,
            Value::I64(_) => Some(ColumnType::I64),
            Value::F64(_) => Some(ColumnType::F64),
            Value::String(_) => Some(ColumnType::String),
            Value::Bool(_) => Some(ColumnType::Bool),
            Value::Decimal(_) => Some(ColumnType::Decimal),
            Value::DateTime(_) => Some(ColumnType::DateTime),
            Value::Date(_) => Some(ColumnType::Date),
        }
    }

    /// Short name of the runtime variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Decimal(_) => "decimal",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
        }
    }

    /// Converts this value into the target column type.
    ///
    /// `None` passes through unchanged (the destination keeps its default).
    /// Returns `None` when the runtime value cannot inhabit the target type;
    /// callers turn that into a `TypeMismatch` error fatal to the row.
    pub fn coerce(&self, target: ColumnType) -> Option<Value> {
        if self.is_none() {
            return Some(Value::None);
        }
        match target {
            ColumnType::I64 => self.as_i64().map(Value::I64),
            ColumnType::F64 => self.as_f64().map(Value::F64),
            ColumnType::Bool => self.as_bool().map(Value::Bool),
            ColumnType::String => self.as_str().map(|s| Value::String(s.into())),
            ColumnType::Decimal => self.as_decimal().map(Value::Decimal),
            ColumnType::DateTime => self.as_datetime().map(Value::DateTime),
            ColumnType::Date => self.as_date().map(Value::Date),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into())
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::None,
        }
    }
}
