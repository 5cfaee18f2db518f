//! Orders Example
//!
//! Maps a Northwind-style order result set onto a plain struct with every
//! construction and mapping strategy RowForge ships, then prints a comparison
//! of their throughput along with a small expression-to-SQL demonstration.
//!
//! Pass a TOML file as the first argument to run a subset of strategies:
//!
//! ```toml
//! construct = ["direct", "emitted"]
//! map = ["probing", "closure"]
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use rowforge::prelude::*;
use rowforge::{
    compile_predicate, encode_current_row, map_record, BenchmarkBuilder, BenchmarkResult,
    ConstructorCache, ConstructorRegistry, CsvExporter, EmittedConstructor, Expr, FieldTable,
    MapperCache, MarkdownReport, MemoryCursor, Record, Result, RowForgeError, Shape, SqlBuilder,
};

/// Destination type: one row of the Orders result set.
#[derive(Debug, Default, Clone, RowShaped)]
pub struct Order {
    #[column(rename = "OrderId")]
    pub order_id: i64,
    #[column(rename = "ShipVia")]
    pub ship_via: Option<i64>,
    #[column(rename = "Freight")]
    pub freight: Option<Decimal>,
    #[column(rename = "ShipName")]
    pub ship_name: Option<String>,
    #[column(rename = "ShipCountry")]
    pub ship_country: Option<String>,
}

const ROWS: i64 = 10_000;
const WARMUP: usize = 2;
const RUNS: usize = 5;

/// Which strategies to exercise. Defaults to all of them.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    construct: Vec<ConstructStrategy>,
    map: Vec<MapStrategy>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            construct: ConstructStrategy::ALL.to_vec(),
            map: MapStrategy::ALL.to_vec(),
        }
    }
}

impl DemoConfig {
    fn load() -> Result<Self> {
        let Some(path) = std::env::args().nth(1) else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| RowForgeError::Internal(format!("config read '{path}': {e}")))?;
        toml::from_str(&raw)
            .map_err(|e| RowForgeError::Internal(format!("config parse '{path}': {e}")))
    }
}

/// Builds the order scenario: ROWS rows, schema matching `Order`'s columns.
fn order_cursor() -> MemoryCursor {
    let mut cursor = MemoryCursor::new(vec![
        FieldDef::new("OrderId", ColumnType::I64),
        FieldDef::new("ShipVia", ColumnType::I64),
        FieldDef::new("Freight", ColumnType::Decimal),
        FieldDef::new("ShipName", ColumnType::String),
        FieldDef::new("ShipCountry", ColumnType::String),
    ]);
    for i in 0..ROWS {
        cursor.push_row(vec![
            Value::I64(183 + i),
            Value::I64(i % 5),
            Value::Decimal(Decimal::new(555 + i, 0)),
            Value::from("Acme Inc."),
            Value::from("SomeCountry"),
        ]);
    }
    cursor
}

fn bench<T, M>(strategy: &str, mapping: M) -> Result<BenchmarkResult>
where
    M: Fn(&mut MemoryCursor) -> Result<Vec<T>>,
{
    BenchmarkBuilder::<T>::new("Order Mapping")
        .with_strategy_name(strategy)
        .with_scenario_name("orders")
        .with_warmup_count(WARMUP)
        .with_run_count(RUNS)
        .build(order_cursor, mapping)
        .run()
}

fn construction_benchmarks(strategies: &[ConstructStrategy]) -> Result<Vec<BenchmarkResult>> {
    let registry = ConstructorRegistry::new();
    registry.register::<Order>();
    let cache = ConstructorCache::new();

    let mut results = Vec::new();
    for strategy in strategies {
        let label = format!("construct/{strategy}");
        let result = match strategy {
            ConstructStrategy::Direct => bench(&label, |cursor| {
                let mut out = Vec::new();
                while cursor.advance() {
                    out.push(rowforge::construct_direct::<Order>());
                }
                Ok(out)
            })?,

            ConstructStrategy::Lookup => bench(&label, |cursor| {
                let mut out = Vec::new();
                while cursor.advance() {
                    out.push(registry.invoke::<Order>()?);
                }
                Ok(out)
            })?,

            ConstructStrategy::Activate => bench(&label, |cursor| {
                let mut out = Vec::new();
                while cursor.advance() {
                    match registry.activate::<Order>() {
                        Some(order) => out.push(order),
                        None => break,
                    }
                }
                Ok(out)
            })?,

            ConstructStrategy::Closure => bench(&label, |cursor| {
                let ctor = cache.constructor::<Order>()?;
                let mut out = Vec::new();
                while cursor.advance() {
                    out.push(ctor());
                }
                Ok(out)
            })?,

            ConstructStrategy::Emitted => {
                // The emitted path constructs dynamic records over an
                // all-integer shape; String and Decimal have no flat slots.
                let shape = Shape::new(
                    "OrderFlat",
                    vec![
                        FieldDef::new("OrderId", ColumnType::I64),
                        FieldDef::new("ShipVia", ColumnType::I64),
                    ],
                );
                let emitted = EmittedConstructor::emit(&shape)?;
                bench(&label, |cursor| {
                    let mut out: Vec<Record> = Vec::new();
                    while cursor.advance() {
                        out.push(emitted.construct()?);
                    }
                    Ok(out)
                })?
            }
        };
        results.push(result);
    }

    Ok(results)
}

/// Hand-written mapping with hard-coded ordinals: fastest and most brittle.
fn map_manual(cursor: &MemoryCursor) -> Result<Order> {
    Ok(Order {
        order_id: cursor.get_i64(0)?,
        ship_via: (!cursor.is_null(1)).then(|| cursor.get_i64(1)).transpose()?,
        freight: (!cursor.is_null(2))
            .then(|| cursor.get_decimal(2))
            .transpose()?,
        ship_name: (!cursor.is_null(3))
            .then(|| cursor.get_str(3).map(|s| s.to_string()))
            .transpose()?,
        ship_country: (!cursor.is_null(4))
            .then(|| cursor.get_str(4).map(|s| s.to_string()))
            .transpose()?,
    })
}

fn mapping_benchmarks(strategies: &[MapStrategy]) -> Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    // Manual mapping and the dynamic-record path are demo-only comparison
    // points, always included.
    results.push(bench("map/manual", |cursor| {
        let mut out: Vec<Order> = Vec::new();
        while cursor.advance() {
            out.push(map_manual(cursor)?);
        }
        Ok(out)
    })?);

    let mappers = MapperCache::new();
    for strategy in strategies {
        let label = format!("map/{strategy}");
        let result = match strategy {
            MapStrategy::Probing => bench(&label, |cursor| {
                let mut out: Vec<Order> = Vec::new();
                while cursor.advance() {
                    out.push(map_probing(cursor)?);
                }
                Ok(out)
            })?,

            MapStrategy::Table => bench(&label, |cursor| {
                let table = FieldTable::build::<Order>(cursor);
                let mut out: Vec<Order> = Vec::new();
                while cursor.advance() {
                    out.push(table.map(cursor)?);
                }
                Ok(out)
            })?,

            MapStrategy::Closure => bench(&label, |cursor| {
                let mapper = mappers.mapper::<Order>(cursor)?;
                let mut out: Vec<Order> = Vec::new();
                while cursor.advance() {
                    out.push(mapper(cursor)?);
                }
                Ok(out)
            })?,
        };
        results.push(result);
    }

    let shape = Shape::of::<Order>();
    results.push(bench("map/record", move |cursor| {
        let mut out: Vec<Record> = Vec::new();
        while cursor.advance() {
            out.push(map_record(&shape, cursor)?);
        }
        Ok(out)
    })?);

    Ok(results)
}

/// Renders a predicate as SQL and runs its compiled form over a flat cursor.
fn expression_demo() -> Result<()> {
    let predicate = Expr::gt(Expr::column("ShipVia"), Expr::int(2));

    let mut sql = SqlBuilder::new();
    let query = sql.select::<Order>(&predicate)?;
    println!("Generated SQL:\n  {query}\n");

    // Compiled filtering needs an all-integer shape.
    let shape = Shape::new(
        "OrderFlat",
        vec![
            FieldDef::new("OrderId", ColumnType::I64),
            FieldDef::new("ShipVia", ColumnType::I64),
        ],
    );
    let compiled = compile_predicate(&predicate, &shape)?;

    let mut cursor = MemoryCursor::new(shape.fields.clone());
    for i in 0..10 {
        cursor.push_row(vec![Value::I64(183 + i), Value::I64(i % 5)]);
    }
    let mut matched = 0u64;
    while cursor.advance() {
        let row = encode_current_row(&cursor)?;
        if compiled.matches(&row) {
            matched += 1;
        }
    }
    println!("Compiled predicate matched {matched} of 10 rows\n");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = DemoConfig::load()?;
    info!(
        rows = ROWS,
        warmup = WARMUP,
        runs = RUNS,
        construct = config.construct.len(),
        map = config.map.len(),
        "starting order benchmarks"
    );

    expression_demo()?;

    let mut results = construction_benchmarks(&config.construct)?;
    results.extend(mapping_benchmarks(&config.map)?);

    let refs: Vec<&BenchmarkResult> = results.iter().collect();
    println!("{}", MarkdownReport::comparison(&refs));

    if let Some(first) = results.first() {
        print!("{}", CsvExporter::to_string(first));
    }

    Ok(())
}
