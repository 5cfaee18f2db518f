//! Benchmarking framework for RowForge.
//!
//! Measures mapping and construction strategies against cursor scenarios,
//! collects per-run statistics, and generates reports.
//!
//! # Overview
//!
//! The framework lets you:
//! - Run multiple strategies against the same data scenario
//! - Execute warmup runs before measurement
//! - Collect per-run timing and row counts
//! - Export results to CSV and Markdown
//!
//! # Zero-Erasure Design
//!
//! The runner stores the cursor factory `P` and mapping operation `M` as
//! concrete type parameters, not trait objects, so the measured loop carries
//! only the dispatch the strategy itself has.
//!
//! # Example
//!
//! ```
//! use rowforge_benchmark::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::new("Order Mapping")
//!     .with_warmup_count(2)
//!     .with_run_count(5)
//!     .with_csv_output("results.csv")
//!     .with_markdown_output("report.md");
//!
//! assert_eq!(config.name(), "Order Mapping");
//! assert_eq!(config.warmup_count(), 2);
//! assert_eq!(config.run_count(), 5);
//! ```
//!
//! Full usage with a cursor factory and a mapping operation:
//!
//! ```text
//! let benchmark = BenchmarkBuilder::<Order>::new("Order Mapping")
//!     .with_strategy_name("table")
//!     .with_scenario_name("northwind")
//!     .build(|| make_cursor(), |cursor| map_all(cursor));
//! let result = benchmark.run()?;
//! println!("{}", MarkdownReport::to_string(&result));
//! ```

mod config;
mod report;
mod result;
mod runner;

pub use config::BenchmarkConfig;
pub use report::{CsvExporter, MarkdownReport};
pub use result::{BenchmarkResult, BenchmarkRun};
pub use runner::{Benchmark, BenchmarkBuilder};
