//! End-to-end mapping through the public API: derived shape, in-memory
//! cursor, every library strategy.

use rust_decimal::Decimal;

use rowforge::prelude::*;
use rowforge::{map_record, FieldTable, MapperCache, Shape};

#[derive(Debug, Default, Clone, PartialEq, RowShaped)]
struct Order {
    #[column(rename = "OrderId")]
    order_id: i64,
    #[column(rename = "ShipVia")]
    ship_via: Option<i64>,
    #[column(rename = "Freight")]
    freight: Option<Decimal>,
    #[column(rename = "ShipName")]
    ship_name: Option<String>,
    #[column(rename = "ShipCountry")]
    ship_country: Option<String>,
    #[column(rename = "Notes")]
    notes: Option<String>,
}

fn order_cursor() -> MemoryCursor {
    // No Notes column; that field must keep its default.
    MemoryCursor::new(vec![
        FieldDef::new("OrderId", ColumnType::I64),
        FieldDef::new("ShipVia", ColumnType::I64),
        FieldDef::new("Freight", ColumnType::Decimal),
        FieldDef::new("ShipName", ColumnType::String),
        FieldDef::new("ShipCountry", ColumnType::String),
    ])
    .with_row(vec![
        Value::I64(183),
        Value::I64(2),
        Value::Decimal(Decimal::new(555, 0)),
        Value::from("Acme Inc."),
        Value::from("SomeCountry"),
    ])
}

fn assert_mapped(order: &Order) {
    assert_eq!(order.order_id, 183);
    assert_eq!(order.ship_via, Some(2));
    assert_eq!(order.freight, Some(Decimal::new(555, 0)));
    assert_eq!(order.ship_name.as_deref(), Some("Acme Inc."));
    assert_eq!(order.ship_country.as_deref(), Some("SomeCountry"));
    assert_eq!(order.notes, None);
}

#[test]
fn probing_maps_first_row() {
    let mut cursor = order_cursor();
    assert!(cursor.advance());
    let order: Order = map_probing(&cursor).unwrap();
    assert_mapped(&order);
}

#[test]
fn table_and_probing_agree() {
    let mut cursor = order_cursor();
    let table = FieldTable::build::<Order>(&cursor);
    assert!(cursor.advance());
    let via_table: Order = table.map(&cursor).unwrap();
    let via_probing: Order = map_probing(&cursor).unwrap();
    assert_eq!(via_table, via_probing);
}

#[test]
fn cached_mapper_is_idempotent() {
    let cache = MapperCache::new();
    let mapper = cache.mapper::<Order>(&order_cursor()).unwrap();

    let mut first = order_cursor();
    let mut second = order_cursor();
    assert!(first.advance());
    assert!(second.advance());
    assert_eq!(mapper(&first).unwrap(), mapper(&second).unwrap());
    assert_eq!(cache.len(), 1);
}

#[test]
fn empty_cursor_yields_defaults() {
    let mut cursor = MemoryCursor::new(vec![FieldDef::new("OrderId", ColumnType::I64)]);
    let order: Order = map_first(&mut cursor).unwrap();
    assert_eq!(order, Order::default());
}

#[test]
fn map_all_drains_every_row() {
    let mut cursor = order_cursor().with_row(vec![
        Value::I64(184),
        Value::None,
        Value::None,
        Value::None,
        Value::None,
    ]);
    let orders: Vec<Order> = map_all(&mut cursor).unwrap();
    assert_eq!(orders.len(), 2);
    assert_mapped(&orders[0]);
    assert_eq!(orders[1].order_id, 184);
    assert_eq!(orders[1].ship_via, None);
}

#[test]
fn dynamic_record_matches_static_mapping() {
    let shape = Shape::of::<Order>();
    let mut cursor = order_cursor();
    assert!(cursor.advance());
    let record = map_record(&shape, &cursor).unwrap();
    assert_eq!(record.get(0), Some(&Value::I64(183)));
    assert_eq!(record.get(3), Some(&Value::from("Acme Inc.")));
    // Unbound Notes field defaults to None.
    assert_eq!(record.get(5), Some(&Value::None));
}
