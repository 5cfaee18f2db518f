//! Native code emission for row predicates and default construction.
//!
//! This crate compiles expression trees into native function pointers via
//! Cranelift, eliminating the AST-walking interpreter overhead on hot row
//! paths.
//!
//! # Row Memory Layout
//!
//! Emitted functions operate on a flat `&[i64]` row buffer where each column
//! occupies one i64 slot. The [`rowforge_core::Value`] tagged union is
//! bypassed entirely; absent values are encoded as [`NONE_SENTINEL`].
//!
//! # Function Signatures
//!
//! - **Predicate**: `fn(row: *const i64) -> i64` (0 or 1)
//! - **Constructor**: `fn(out: *mut i64)`

#[cfg(test)]
mod tests;

mod compiler;
mod flat;

pub use compiler::{compile_defaults, compile_predicate, JitConstructor, JitPredicate};
pub use flat::{decode_record, encode_current_row, is_flat, NONE_SENTINEL};
