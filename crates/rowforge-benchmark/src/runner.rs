//! Benchmark runner.

use std::marker::PhantomData;
use std::time::Instant;

use tracing::info;

use rowforge_core::{Result, RowCursor};

use crate::config::BenchmarkConfig;
use crate::result::{BenchmarkResult, BenchmarkRun};

/// Zero-erasure benchmark runner.
///
/// Executes a mapping operation against fresh cursors, warmup first, then
/// measured runs. The cursor factory and the mapping operation are stored as
/// concrete generic type parameters, so the measured loop carries no virtual
/// dispatch the strategy itself does not have.
///
/// # Type Parameters
///
/// * `T` - The destination type produced per row
/// * `C` - The cursor type
/// * `P` - Cursor factory: `Fn() -> C`
/// * `M` - Mapping operation: `Fn(&mut C) -> Result<Vec<T>>`
pub struct Benchmark<T, C, P, M>
where
    C: RowCursor,
    P: Fn() -> C,
    M: Fn(&mut C) -> Result<Vec<T>>,
{
    config: BenchmarkConfig,
    strategy_name: String,
    scenario_name: String,
    cursor_factory: P,
    mapping: M,
    _phantom: PhantomData<(T, C)>,
}

impl<T, C, P, M> Benchmark<T, C, P, M>
where
    C: RowCursor,
    P: Fn() -> C,
    M: Fn(&mut C) -> Result<Vec<T>>,
{
    /// Creates a new benchmark.
    ///
    /// # Arguments
    ///
    /// * `config` - Warmup count, run count, output paths
    /// * `strategy_name` - Name identifying the strategy under measurement
    /// * `scenario_name` - Name identifying the data scenario
    /// * `cursor_factory` - Produces a fresh cursor for every run
    /// * `mapping` - The operation being measured; drains one cursor
    pub fn new(
        config: BenchmarkConfig,
        strategy_name: impl Into<String>,
        scenario_name: impl Into<String>,
        cursor_factory: P,
        mapping: M,
    ) -> Self {
        Self {
            config,
            strategy_name: strategy_name.into(),
            scenario_name: scenario_name.into(),
            cursor_factory,
            mapping,
            _phantom: PhantomData,
        }
    }

    /// Runs the benchmark and returns aggregated results.
    ///
    /// Warmup runs execute the exact measured operation but record nothing.
    /// A mapping failure in any run aborts the whole benchmark.
    pub fn run(&self) -> Result<BenchmarkResult> {
        for _ in 0..self.config.warmup_count() {
            self.run_once()?;
        }

        let mut result = BenchmarkResult::new(
            self.config.name(),
            &self.strategy_name,
            &self.scenario_name,
        );

        for run_index in 0..self.config.run_count() {
            let start = Instant::now();
            let mapped = self.run_once()?;
            let elapsed = start.elapsed();
            info!(
                strategy = %self.strategy_name,
                run_index,
                rows = mapped.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "measured run complete"
            );
            result.add_run(BenchmarkRun::new(run_index, elapsed, mapped.len() as u64));
        }

        Ok(result)
    }

    fn run_once(&self) -> Result<Vec<T>> {
        let mut cursor = (self.cursor_factory)();
        (self.mapping)(&mut cursor)
    }
}

/// Builder for creating benchmarks with a fluent API.
pub struct BenchmarkBuilder<T> {
    config: BenchmarkConfig,
    strategy_name: String,
    scenario_name: String,
    _phantom: PhantomData<T>,
}

impl<T> BenchmarkBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: BenchmarkConfig::new(name),
            strategy_name: "default".to_string(),
            scenario_name: "default".to_string(),
            _phantom: PhantomData,
        }
    }

    pub fn with_strategy_name(mut self, name: impl Into<String>) -> Self {
        self.strategy_name = name.into();
        self
    }

    pub fn with_scenario_name(mut self, name: impl Into<String>) -> Self {
        self.scenario_name = name.into();
        self
    }

    pub fn with_warmup_count(mut self, count: usize) -> Self {
        self.config = self.config.with_warmup_count(count);
        self
    }

    pub fn with_run_count(mut self, count: usize) -> Self {
        self.config = self.config.with_run_count(count);
        self
    }

    /// Builds the benchmark with the given factories.
    pub fn build<C, P, M>(self, cursor_factory: P, mapping: M) -> Benchmark<T, C, P, M>
    where
        C: RowCursor,
        P: Fn() -> C,
        M: Fn(&mut C) -> Result<Vec<T>>,
    {
        Benchmark::new(
            self.config,
            self.strategy_name,
            self.scenario_name,
            cursor_factory,
            mapping,
        )
    }
}
