//! Tests for JIT-compiled predicates and constructors.

use rowforge_core::{ColumnType, FieldDef, MemoryCursor, RowCursor, Shape, Value};
use rowforge_expr::Expr;

use crate::compiler::{compile_defaults, compile_predicate};
use crate::flat::{decode_record, encode_current_row, NONE_SENTINEL};

fn order_shape() -> Shape {
    Shape::new(
        "Order",
        vec![
            FieldDef::new("OrderId", ColumnType::I64),
            FieldDef::new("ShipVia", ColumnType::I64),
            FieldDef::new("Shipped", ColumnType::Bool),
        ],
    )
}

fn row(fields: &[i64]) -> Vec<i64> {
    fields.to_vec()
}

#[test]
fn test_predicate_field_access() {
    let shape = order_shape();
    let f = compile_predicate(&Expr::field(1), &shape).unwrap();
    assert_eq!(f.call(&row(&[10, 20, 1])), 20);
}

#[test]
fn test_predicate_literal() {
    let shape = order_shape();
    let f = compile_predicate(&Expr::int(42), &shape).unwrap();
    assert_eq!(f.call(&row(&[0, 0, 0])), 42);
}

#[test]
fn test_predicate_column_by_name() {
    let shape = order_shape();
    let f = compile_predicate(&Expr::gt(Expr::column("shipvia"), Expr::int(2)), &shape).unwrap();
    assert!(f.matches(&row(&[183, 3, 1])));
    assert!(!f.matches(&row(&[183, 2, 1])));
}

#[test]
fn test_predicate_unknown_column() {
    let shape = order_shape();
    let err = compile_predicate(&Expr::column("Freight"), &shape).unwrap_err();
    assert!(err.to_string().contains("Freight"));
}

#[test]
fn test_predicate_and() {
    let shape = order_shape();
    let f = compile_predicate(
        &Expr::and(
            Expr::eq(Expr::field(0), Expr::int(183)),
            Expr::lt(Expr::field(1), Expr::int(5)),
        ),
        &shape,
    )
    .unwrap();
    assert!(f.matches(&row(&[183, 2, 0])));
    assert!(!f.matches(&row(&[183, 9, 0])));
    assert!(!f.matches(&row(&[184, 2, 0])));
}

#[test]
fn test_predicate_arithmetic() {
    let shape = order_shape();
    let f = compile_predicate(&Expr::abs(Expr::sub(Expr::field(0), Expr::field(1))), &shape)
        .unwrap();
    assert_eq!(f.call(&row(&[10, 3, 0])), 7);
    assert_eq!(f.call(&row(&[3, 10, 0])), 7);
}

#[test]
fn test_predicate_min_max() {
    let shape = order_shape();
    let min = compile_predicate(&Expr::min(Expr::field(0), Expr::field(1)), &shape).unwrap();
    let max = compile_predicate(&Expr::max(Expr::field(0), Expr::field(1)), &shape).unwrap();
    assert_eq!(min.call(&row(&[10, 3, 0])), 3);
    assert_eq!(max.call(&row(&[10, 3, 0])), 10);
}

#[test]
fn test_predicate_conditional() {
    let shape = order_shape();
    let f = compile_predicate(
        &Expr::if_then_else(
            Expr::ge(Expr::field(1), Expr::int(3)),
            Expr::int(100),
            Expr::int(-100),
        ),
        &shape,
    )
    .unwrap();
    assert_eq!(f.call(&row(&[0, 3, 0])), 100);
    assert_eq!(f.call(&row(&[0, 2, 0])), -100);
}

#[test]
fn test_predicate_null_checks() {
    let shape = order_shape();
    let is_null = compile_predicate(&Expr::is_null(Expr::field(1)), &shape).unwrap();
    let not_null = compile_predicate(&Expr::is_not_null(Expr::field(1)), &shape).unwrap();
    assert!(is_null.matches(&row(&[1, NONE_SENTINEL, 0])));
    assert!(!is_null.matches(&row(&[1, 2, 0])));
    assert!(not_null.matches(&row(&[1, 2, 0])));
}

#[test]
fn test_predicate_not() {
    let shape = order_shape();
    let f = compile_predicate(&Expr::not(Expr::eq(Expr::field(0), Expr::int(1))), &shape).unwrap();
    assert!(!f.matches(&row(&[1, 0, 0])));
    assert!(f.matches(&row(&[2, 0, 0])));
}

#[test]
fn test_division_unsupported() {
    let shape = order_shape();
    let err = compile_predicate(&Expr::div(Expr::field(0), Expr::int(2)), &shape).unwrap_err();
    assert!(err.to_string().contains("unsupported"));
}

#[test]
fn test_string_column_unsupported() {
    let shape = Shape::new("S", vec![FieldDef::new("Name", ColumnType::String)]);
    assert!(compile_predicate(&Expr::column("Name"), &shape).is_err());
}

#[test]
fn test_defaults_reject_non_flat_shape() {
    let shape = Shape::new("S", vec![FieldDef::new("Name", ColumnType::String)]);
    let err = compile_defaults(&shape).unwrap_err();
    assert!(err.to_string().contains("Name"));

    let shape = Shape::new("S", vec![FieldDef::new("Freight", ColumnType::Decimal)]);
    assert!(compile_defaults(&shape).is_err());
}

#[test]
fn test_defaults_all_sentinel() {
    let shape = order_shape();
    let ctor = compile_defaults(&shape).unwrap();
    assert_eq!(ctor.width(), 3);
    let buf = ctor.invoke();
    assert_eq!(buf, vec![NONE_SENTINEL; 3]);

    let record = decode_record(&shape, &buf).unwrap();
    assert!(record.fields.iter().all(|v| *v == Value::None));
}

#[test]
fn test_defaults_independent_buffers() {
    let shape = order_shape();
    let ctor = compile_defaults(&shape).unwrap();
    let mut a = ctor.invoke();
    let b = ctor.invoke();
    a[0] = 7;
    assert_eq!(b[0], NONE_SENTINEL);
}

#[test]
fn test_encode_then_filter() {
    let shape = order_shape();
    let mut cursor = MemoryCursor::new(shape.fields.clone());
    cursor.push_row(vec![Value::I64(183), Value::I64(2), Value::Bool(true)]);
    assert!(cursor.advance());

    let buf = encode_current_row(&cursor).unwrap();
    assert_eq!(buf, vec![183, 2, 1]);

    let f = compile_predicate(
        &Expr::eq(Expr::column("OrderId"), Expr::int(183)),
        &shape,
    )
    .unwrap();
    assert!(f.matches(&buf));
}
