//! Interpreted expression evaluation against a cursor row.

use rowforge_core::{RowCursor, Value};

use crate::compare::{compare_values, values_equal};
use crate::expr::Expr;

/// Context for expression evaluation: a cursor positioned on a row.
pub struct RowContext<'a> {
    cursor: &'a dyn RowCursor,
}

impl<'a> RowContext<'a> {
    /// Creates an evaluation context over the cursor's current row.
    pub fn new(cursor: &'a dyn RowCursor) -> Self {
        Self { cursor }
    }

    fn column_value(&self, name: &str) -> Value {
        match self.cursor.ordinal(name) {
            Some(ordinal) => self.cursor.value(ordinal),
            None => Value::None,
        }
    }

    fn field_value(&self, ordinal: usize) -> Value {
        if ordinal < self.cursor.column_count() {
            self.cursor.value(ordinal)
        } else {
            Value::None
        }
    }
}

/// Evaluates an expression in the given context.
///
/// Evaluation is total: missing columns and type-incompatible operands
/// produce `Value::None` (or false for boolean nodes) rather than errors.
pub fn eval_expr(expr: &Expr, ctx: &RowContext) -> Value {
    match expr {
        Expr::Literal(v) => v.clone(),

        Expr::Column(name) => ctx.column_value(name),

        Expr::Field(ordinal) => ctx.field_value(*ordinal),

        Expr::Eq(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(values_equal(&l, &r))
        }

        Expr::Ne(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(!values_equal(&l, &r))
        }

        Expr::Lt(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(compare_values(&l, &r).map(|o| o.is_lt()).unwrap_or(false))
        }

        Expr::Le(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(compare_values(&l, &r).map(|o| o.is_le()).unwrap_or(false))
        }

        Expr::Gt(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(compare_values(&l, &r).map(|o| o.is_gt()).unwrap_or(false))
        }

        Expr::Ge(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            Value::Bool(compare_values(&l, &r).map(|o| o.is_ge()).unwrap_or(false))
        }

        Expr::And(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match (l.as_bool(), r.as_bool()) {
                (Some(a), Some(b)) => Value::Bool(a && b),
                _ => Value::Bool(false),
            }
        }

        Expr::Or(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match (l.as_bool(), r.as_bool()) {
                (Some(a), Some(b)) => Value::Bool(a || b),
                _ => Value::Bool(false),
            }
        }

        Expr::Not(inner) => {
            let v = eval_expr(inner, ctx);
            match v.as_bool() {
                Some(b) => Value::Bool(!b),
                None => Value::Bool(true), // None is considered false
            }
        }

        Expr::Abs(inner) => {
            let v = eval_expr(inner, ctx);
            match v {
                Value::I64(n) => Value::I64(n.abs()),
                Value::F64(n) => Value::F64(n.abs()),
                Value::Decimal(n) => Value::Decimal(n.abs()),
                _ => Value::None,
            }
        }

        Expr::Add(left, right) => arith(left, right, ctx, |a, b| a + b, |a, b| a + b),

        Expr::Sub(left, right) => arith(left, right, ctx, |a, b| a - b, |a, b| a - b),

        Expr::Mul(left, right) => arith(left, right, ctx, |a, b| a * b, |a, b| a * b),

        Expr::Div(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match (&l, &r) {
                (Value::I64(a), Value::I64(b)) if *b != 0 => Value::I64(a / b),
                (Value::F64(a), Value::F64(b)) if *b != 0.0 => Value::F64(a / b),
                _ => Value::None,
            }
        }

        Expr::Mod(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match (&l, &r) {
                (Value::I64(a), Value::I64(b)) if *b != 0 => Value::I64(a % b),
                _ => Value::None,
            }
        }

        Expr::Neg(inner) => {
            let v = eval_expr(inner, ctx);
            match v {
                Value::I64(n) => Value::I64(-n),
                Value::F64(n) => Value::F64(-n),
                Value::Decimal(n) => Value::Decimal(-n),
                _ => Value::None,
            }
        }

        Expr::Min(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match compare_values(&l, &r) {
                Some(ord) if ord.is_gt() => r,
                Some(_) => l,
                None => Value::None,
            }
        }

        Expr::Max(left, right) => {
            let l = eval_expr(left, ctx);
            let r = eval_expr(right, ctx);
            match compare_values(&l, &r) {
                Some(ord) if ord.is_lt() => r,
                Some(_) => l,
                None => Value::None,
            }
        }

        Expr::If {
            cond,
            then_expr,
            else_expr,
        } => {
            let cond_val = eval_expr(cond, ctx);
            if cond_val.as_bool().unwrap_or(false) {
                eval_expr(then_expr, ctx)
            } else {
                eval_expr(else_expr, ctx)
            }
        }

        Expr::IsNull(inner) => {
            let v = eval_expr(inner, ctx);
            Value::Bool(v.is_none())
        }

        Expr::IsNotNull(inner) => {
            let v = eval_expr(inner, ctx);
            Value::Bool(!v.is_none())
        }
    }
}

fn arith(
    left: &Expr,
    right: &Expr,
    ctx: &RowContext,
    int_op: impl FnOnce(i64, i64) -> i64,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Value {
    let l = eval_expr(left, ctx);
    let r = eval_expr(right, ctx);
    match (&l, &r) {
        (Value::I64(a), Value::I64(b)) => Value::I64(int_op(*a, *b)),
        (Value::F64(a), Value::F64(b)) => Value::F64(float_op(*a, *b)),
        (Value::I64(a), Value::F64(b)) => Value::F64(float_op(*a as f64, *b)),
        (Value::F64(a), Value::I64(b)) => Value::F64(float_op(*a, *b as f64)),
        _ => Value::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::{ColumnType, FieldDef, MemoryCursor};

    fn user_cursor() -> MemoryCursor {
        let mut cursor = MemoryCursor::new(vec![
            FieldDef::new("Id", ColumnType::I64),
            FieldDef::new("Name", ColumnType::String),
            FieldDef::new("Age", ColumnType::I64),
        ])
        .with_row(vec![Value::I64(1), Value::from("Alice"), Value::I64(31)]);
        cursor.advance();
        cursor
    }

    #[test]
    fn test_arithmetic() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        // 10 + 5, 10 * 5 via operator syntax
        assert_eq!(
            eval_expr(&(Expr::int(10) + Expr::int(5)), &ctx),
            Value::I64(15)
        );
        assert_eq!(
            eval_expr(&(Expr::int(10) * Expr::int(5)), &ctx),
            Value::I64(50)
        );
        assert_eq!(
            eval_expr(&Expr::div(Expr::int(10), Expr::int(0)), &ctx),
            Value::None
        );
    }

    #[test]
    fn test_logical() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        let t = Expr::bool(true);
        let f = Expr::bool(false);
        assert_eq!(
            eval_expr(&Expr::and(t.clone(), f.clone()), &ctx),
            Value::Bool(false)
        );
        assert_eq!(eval_expr(&Expr::or(t, f), &ctx), Value::Bool(true));
    }

    #[test]
    fn test_conditional() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        // age >= 18 ? "Adult" : "Minor"
        let status = Expr::if_then_else(
            Expr::ge(Expr::column("Age"), Expr::int(18)),
            Expr::string("Adult"),
            Expr::string("Minor"),
        );
        assert_eq!(eval_expr(&status, &ctx), Value::from("Adult"));
    }

    #[test]
    fn test_column_access() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        assert_eq!(eval_expr(&Expr::column("Name"), &ctx), Value::from("Alice"));
        assert_eq!(eval_expr(&Expr::field(2), &ctx), Value::I64(31));
        // Missing column absorbs to None rather than failing.
        assert_eq!(eval_expr(&Expr::column("Missing"), &ctx), Value::None);
        assert_eq!(
            eval_expr(&Expr::is_null(Expr::column("Missing")), &ctx),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_predicate_over_row() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        let pred = Expr::gt(Expr::column("Age"), Expr::int(25));
        assert_eq!(eval_expr(&pred, &ctx), Value::Bool(true));
        let pred = Expr::gt(Expr::column("Age"), Expr::int(40));
        assert_eq!(eval_expr(&pred, &ctx), Value::Bool(false));
    }

    #[test]
    fn test_min_max_abs() {
        let cursor = user_cursor();
        let ctx = RowContext::new(&cursor);
        assert_eq!(
            eval_expr(&Expr::min(Expr::int(3), Expr::int(7)), &ctx),
            Value::I64(3)
        );
        assert_eq!(
            eval_expr(&Expr::max(Expr::int(3), Expr::int(7)), &ctx),
            Value::I64(7)
        );
        assert_eq!(eval_expr(&Expr::abs(Expr::int(-9)), &ctx), Value::I64(9));
    }
}
