//! Core types for RowForge.
//!
//! This crate defines the pieces every strategy shares: runtime [`Value`]s,
//! [`Shape`] descriptors (runtime and compile-time), the [`RowCursor`]
//! abstraction over tabular sources, and [`Record`] instances of runtime
//! shapes. Construction and mapping strategies live in `rowforge-mapper`;
//! expression trees in `rowforge-expr`.

mod cursor;
mod error;
mod record;
mod shape;
mod shaped;
mod value;

pub use cursor::{MemoryCursor, RowCursor};
pub use error::{Result, RowForgeError};
pub use record::Record;
pub use shape::{Column, ColumnType, FieldDef, Shape};
pub use shaped::{mismatch, RowShaped};
pub use value::Value;
