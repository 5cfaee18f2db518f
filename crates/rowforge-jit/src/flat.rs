//! Flat i64 row encoding shared by emitted functions.
//!
//! Emitted code operates on a flat `i64` buffer where each field occupies one
//! slot. Only integer-representable column types are flat-encodable; `F64`,
//! `String` and `Decimal` columns put a shape outside the emitted path.

use rowforge_core::{ColumnType, Record, Result, RowCursor, RowForgeError, Shape, Value};

/// Slot value standing in for `Value::None`.
pub const NONE_SENTINEL: i64 = i64::MIN;

/// Whether a column type fits one i64 slot.
pub fn is_flat(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::I64 | ColumnType::Bool | ColumnType::DateTime | ColumnType::Date
    )
}

/// Encodes one value into its slot representation.
pub fn slot_from_value(value: &Value) -> Result<i64> {
    match value {
        Value::None => Ok(NONE_SENTINEL),
        Value::I64(v) => Ok(*v),
        Value::Bool(v) => Ok(*v as i64),
        Value::DateTime(v) => Ok(*v),
        Value::Date(v) => Ok(*v as i64),
        other => Err(RowForgeError::UnsupportedExpression(format!(
            "{} values cannot be flat-encoded",
            other.type_name()
        ))),
    }
}

/// Decodes one slot back into a typed value.
pub fn value_from_slot(column_type: ColumnType, slot: i64) -> Result<Value> {
    if slot == NONE_SENTINEL {
        return Ok(Value::None);
    }
    match column_type {
        ColumnType::I64 => Ok(Value::I64(slot)),
        ColumnType::Bool => Ok(Value::Bool(slot != 0)),
        ColumnType::DateTime => Ok(Value::DateTime(slot)),
        ColumnType::Date => Ok(Value::Date(slot as i32)),
        other => Err(RowForgeError::UnsupportedExpression(format!(
            "{other:?} columns cannot be flat-decoded"
        ))),
    }
}

/// Encodes the cursor's current row into a flat buffer, column order as-is.
pub fn encode_current_row(cursor: &dyn RowCursor) -> Result<Vec<i64>> {
    (0..cursor.column_count())
        .map(|ordinal| slot_from_value(&cursor.value(ordinal)))
        .collect()
}

/// Decodes a flat buffer into a record of the given shape.
pub fn decode_record(shape: &Shape, buf: &[i64]) -> Result<Record> {
    if buf.len() != shape.len() {
        return Err(RowForgeError::Internal(format!(
            "flat buffer width {} does not match shape '{}' width {}",
            buf.len(),
            shape.name,
            shape.len()
        )));
    }
    let fields = shape
        .fields
        .iter()
        .zip(buf)
        .map(|(field, slot)| value_from_slot(field.column_type, *slot))
        .collect::<Result<Vec<Value>>>()?;
    Ok(Record::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::FieldDef;

    #[test]
    fn test_slot_round_trip() {
        assert_eq!(slot_from_value(&Value::I64(42)).unwrap(), 42);
        assert_eq!(slot_from_value(&Value::Bool(true)).unwrap(), 1);
        assert_eq!(slot_from_value(&Value::None).unwrap(), NONE_SENTINEL);
        assert_eq!(
            value_from_slot(ColumnType::I64, 42).unwrap(),
            Value::I64(42)
        );
        assert_eq!(
            value_from_slot(ColumnType::Date, 19_000).unwrap(),
            Value::Date(19_000)
        );
        assert_eq!(
            value_from_slot(ColumnType::String, NONE_SENTINEL).unwrap(),
            Value::None
        );
    }

    #[test]
    fn test_non_flat_value_rejected() {
        assert!(slot_from_value(&Value::from("text")).is_err());
        assert!(value_from_slot(ColumnType::String, 7).is_err());
    }

    #[test]
    fn test_decode_record() {
        let shape = Shape::new(
            "Flags",
            vec![
                FieldDef::new("id", ColumnType::I64),
                FieldDef::new("active", ColumnType::Bool),
            ],
        );
        let record = decode_record(&shape, &[5, 1]).unwrap();
        assert_eq!(record.get(0), Some(&Value::I64(5)));
        assert_eq!(record.get(1), Some(&Value::Bool(true)));
        assert!(decode_record(&shape, &[5]).is_err());
    }
}
