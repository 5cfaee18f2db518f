//! Construction and row-mapping strategies over [`rowforge_core`] cursors.
//!
//! Two strategy families, each spanning the same cost spectrum:
//!
//! - **Construction** ([`ConstructStrategy`]): static call, per-call registry
//!   lookup, optional activation, cached closure, emitted native code.
//! - **Mapping** ([`MapStrategy`]): per-row name probing, a resolved binding
//!   table, or a cached closure with the table baked in.
//!
//! Preparation artifacts live in owner-held caches ([`ConstructorCache`],
//! [`MapperCache`]); nothing here is a process-wide singleton.

mod cache;
mod construct;
mod map;

pub use cache::TypeCache;
pub use construct::{
    build_constructor, construct_direct, ConstructStrategy, Constructor, ConstructorCache,
    ConstructorRegistry, EmittedConstructor,
};
pub use map::{
    build_row_mapper, map_all, map_first, map_probing, map_record, FieldTable, MapStrategy,
    MapperCache, RowMapper,
};
