//! Expression trees for RowForge.
//!
//! Expressions evaluate against the current row of a [`rowforge_core::RowCursor`]
//! via the [`eval_expr`] interpreter, can be traversed with an [`ExprVisitor`],
//! and translate to SQL SELECT statements through [`SqlBuilder`]. The JIT
//! path in `rowforge-jit` compiles the same trees to native code.

mod compare;
mod eval;
mod expr;
mod sql;
mod visit;

pub use compare::{compare_values, values_equal};
pub use eval::{eval_expr, RowContext};
pub use expr::Expr;
pub use sql::SqlBuilder;
pub use visit::{ExprVisitor, NodeTrace};
