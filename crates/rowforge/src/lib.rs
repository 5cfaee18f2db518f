//! RowForge - Row mapping and construction strategies in Rust.
//!
//! Zero-wiring API: derive [`RowShaped`] on your destination struct and map
//! cursor rows onto it with the strategy of your choice.
//!
//! # Example
//!
//! ```rust
//! use rowforge::prelude::*;
//!
//! #[derive(Debug, Default, RowShaped)]
//! struct Order {
//!     #[column(rename = "OrderId")]
//!     order_id: i64,
//!     #[column(rename = "ShipName")]
//!     ship_name: Option<String>,
//! }
//!
//! let mut cursor = MemoryCursor::new(vec![
//!     FieldDef::new("OrderId", ColumnType::I64),
//!     FieldDef::new("ShipName", ColumnType::String),
//! ])
//! .with_row(vec![Value::I64(183), Value::from("Acme Inc.")]);
//!
//! let order: Order = map_first(&mut cursor).unwrap();
//! assert_eq!(order.order_id, 183);
//! assert_eq!(order.ship_name.as_deref(), Some("Acme Inc."));
//! ```

// Derive macro for destination structs
pub use rowforge_macros::RowShaped;

// Core data model and cursor abstraction
pub use rowforge_core::{
    mismatch, Column, ColumnType, FieldDef, MemoryCursor, Record, Result, RowCursor,
    RowForgeError, Shape, Value,
};

// The RowShaped trait itself; same name as the derive, different namespace,
// so `use rowforge::RowShaped` brings in both.
pub use rowforge_core::RowShaped;

// Expression trees, interpreter, and SQL rendering
pub use rowforge_expr::{eval_expr, Expr, ExprVisitor, NodeTrace, RowContext, SqlBuilder};

// Native code emission
pub use rowforge_jit::{
    compile_defaults, compile_predicate, decode_record, encode_current_row, JitConstructor,
    JitPredicate, NONE_SENTINEL,
};

// Construction and mapping strategies
pub use rowforge_mapper::{
    build_constructor, build_row_mapper, construct_direct, map_all, map_first, map_probing,
    map_record, ConstructStrategy, Constructor, ConstructorCache, ConstructorRegistry,
    EmittedConstructor, FieldTable, MapStrategy, MapperCache, RowMapper,
};

// Benchmark harness
pub use rowforge_benchmark::{
    Benchmark, BenchmarkBuilder, BenchmarkConfig, BenchmarkResult, BenchmarkRun, CsvExporter,
    MarkdownReport,
};

pub mod prelude {
    pub use super::{map_all, map_first, map_probing};
    pub use super::{Column, ColumnType, FieldDef, MemoryCursor, RowCursor, Value};
    pub use super::{ConstructStrategy, MapStrategy};
    pub use super::RowShaped;
}
