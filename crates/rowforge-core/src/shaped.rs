//! The compile-time shape table for statically declared destination types.

use crate::error::{Result, RowForgeError};
use crate::shape::Column;
use crate::value::Value;

/// A destination type with a statically declared column table.
///
/// Implemented via `#[derive(RowShaped)]`, which builds the table at compile
/// time; nothing here walks the type at runtime. The index into
/// [`RowShaped::columns`] is the accessor index understood by
/// [`RowShaped::apply`].
///
/// The `Default` bound is the parameterless-constructor requirement: every
/// construction strategy produces the declared defaults, and mapping leaves
/// unmatched fields at those defaults.
pub trait RowShaped: Default {
    /// Name of this shape, used for registries and SQL table names.
    const SHAPE_NAME: &'static str;

    /// The ordered column table: one entry per writable field.
    fn columns() -> &'static [Column];

    /// Assigns a value to the field at `field_idx`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the value cannot inhabit the field's declared
    /// type; the caller treats that as fatal to the row.
    fn apply(&mut self, field_idx: usize, value: Value) -> Result<()>;
}

/// Builds the `TypeMismatch` error for a failed assignment.
///
/// Shared by derive-generated `apply` impls so the macro emits one call
/// instead of the full error construction.
pub fn mismatch(column: &Column, value: &Value) -> RowForgeError {
    RowForgeError::TypeMismatch {
        field: column.name.to_string(),
        expected: column.column_type,
        actual: value.type_name(),
    }
}
