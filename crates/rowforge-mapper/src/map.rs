//! Row-to-struct mapping strategies.
//!
//! All strategies share one binding rule: a destination field binds to the
//! first cursor column whose name matches case-insensitively and whose
//! declared type equals the field's declared type. Unbound fields keep their
//! defaults; unbound cursor columns are ignored. A bound value the field
//! cannot hold fails the whole row with `TypeMismatch`.
//!
//! The strategies differ in when binding happens: per call ([`map_probing`]),
//! once per schema ([`FieldTable`]), or once per destination type with the
//! table baked into a cached closure ([`MapperCache`]).

use std::any::{type_name, Any};
use std::fmt;

use serde::Deserialize;
use tracing::{debug, trace};

use rowforge_core::{ColumnType, Record, Result, RowCursor, RowForgeError, RowShaped, Shape};

use crate::cache::TypeCache;

/// How rows get mapped onto a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStrategy {
    /// Name resolution repeated for every row.
    Probing,
    /// Binding table resolved once per cursor schema, reused across rows.
    Table,
    /// Cached closure with the table baked in, one build per type.
    Closure,
}

impl MapStrategy {
    pub const ALL: [MapStrategy; 3] = [
        MapStrategy::Probing,
        MapStrategy::Table,
        MapStrategy::Closure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapStrategy::Probing => "probing",
            MapStrategy::Table => "table",
            MapStrategy::Closure => "closure",
        }
    }
}

impl fmt::Display for MapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn bind_ordinal(cursor: &dyn RowCursor, name: &str, ct: ColumnType) -> Option<usize> {
    (0..cursor.column_count()).find(|&ordinal| {
        cursor.column_name(ordinal).eq_ignore_ascii_case(name) && cursor.column_type(ordinal) == ct
    })
}

/// Maps the cursor's current row, resolving every binding from scratch.
pub fn map_probing<T: RowShaped>(cursor: &dyn RowCursor) -> Result<T> {
    let mut out = T::default();
    for (field_idx, column) in T::columns().iter().enumerate() {
        let Some(ordinal) = bind_ordinal(cursor, column.name, column.column_type) else {
            trace!(field = column.name, "no matching cursor column");
            continue;
        };
        out.apply(field_idx, cursor.value(ordinal))?;
    }
    Ok(out)
}

/// A resolved binding table: pairs of (field index, cursor ordinal).
///
/// Valid only for the cursor schema it was built against; rebinding a table
/// to a cursor with a different column layout maps garbage or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    bindings: Vec<(usize, usize)>,
}

impl FieldTable {
    /// Resolves bindings between `T`'s column table and the cursor schema.
    pub fn build<T: RowShaped>(cursor: &dyn RowCursor) -> Self {
        let bindings = T::columns()
            .iter()
            .enumerate()
            .filter_map(|(field_idx, column)| {
                bind_ordinal(cursor, column.name, column.column_type)
                    .map(|ordinal| (field_idx, ordinal))
            })
            .collect::<Vec<_>>();
        debug!(
            target_type = type_name::<T>(),
            bound = bindings.len(),
            declared = T::columns().len(),
            "resolved binding table"
        );
        Self { bindings }
    }

    /// Maps the cursor's current row through the prebuilt bindings.
    pub fn map<T: RowShaped>(&self, cursor: &dyn RowCursor) -> Result<T> {
        let mut out = T::default();
        for &(field_idx, ordinal) in &self.bindings {
            out.apply(field_idx, cursor.value(ordinal))?;
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A mapping closure with its binding table baked in.
pub type RowMapper<T> = std::sync::Arc<dyn Fn(&dyn RowCursor) -> Result<T> + Send + Sync>;

/// Builds the closure strategy's artifact for `T` against a cursor schema.
pub fn build_row_mapper<T: RowShaped + 'static>(cursor: &dyn RowCursor) -> RowMapper<T> {
    let table = FieldTable::build::<T>(cursor);
    std::sync::Arc::new(move |cursor| table.map::<T>(cursor))
}

/// Owner-held cache of row mappers, keyed by destination type.
///
/// Assumes one cursor schema per destination type for the cache's lifetime;
/// the first schema seen wins.
#[derive(Default)]
pub struct MapperCache {
    inner: TypeCache<dyn Any + Send + Sync>,
}

impl MapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapper<T: RowShaped + 'static>(&self, cursor: &dyn RowCursor) -> Result<RowMapper<T>> {
        let entry = self
            .inner
            .get_or_try_insert::<T>(|| Ok(std::sync::Arc::new(build_row_mapper::<T>(cursor))))?;
        entry
            .downcast_ref::<RowMapper<T>>()
            .cloned()
            .ok_or_else(|| {
                RowForgeError::Internal(format!(
                    "mapper cache entry for '{}' has a different type",
                    type_name::<T>()
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Maps the current row into a dynamic [`Record`] of the given shape.
///
/// The runtime-shape counterpart of [`map_probing`]: same binding rule, no
/// destination struct.
pub fn map_record(shape: &Shape, cursor: &dyn RowCursor) -> Result<Record> {
    let mut record = Record::with_defaults(shape);
    for (field_idx, field) in shape.fields.iter().enumerate() {
        let Some(ordinal) = bind_ordinal(cursor, &field.name, field.column_type) else {
            continue;
        };
        let value = cursor.value(ordinal);
        let coerced = value.coerce(field.column_type).ok_or_else(|| {
            RowForgeError::TypeMismatch {
                field: field.name.to_string(),
                expected: field.column_type,
                actual: value.type_name(),
            }
        })?;
        record.set(field_idx, coerced);
    }
    Ok(record)
}

/// Advances once and maps, yielding the declared defaults on an empty cursor.
pub fn map_first<T: RowShaped>(cursor: &mut dyn RowCursor) -> Result<T> {
    if !cursor.advance() {
        return Ok(T::default());
    }
    map_probing(cursor)
}

/// Drains the cursor through a prebuilt table, one instance per row.
pub fn map_all<T: RowShaped + 'static>(cursor: &mut dyn RowCursor) -> Result<Vec<T>> {
    let table = FieldTable::build::<T>(cursor);
    let mut out = Vec::new();
    while cursor.advance() {
        out.push(table.map(cursor)?);
    }
    Ok(out)
}
