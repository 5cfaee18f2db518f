//! Benchmark result types.

use std::time::Duration;

/// Result of a single measured run.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// Run index (0-based).
    pub run_index: usize,
    /// Wall-clock time for the run.
    pub elapsed: Duration,
    /// Rows mapped during the run.
    pub rows_mapped: u64,
}

impl BenchmarkRun {
    pub fn new(run_index: usize, elapsed: Duration, rows_mapped: u64) -> Self {
        Self {
            run_index,
            elapsed,
            rows_mapped,
        }
    }

    /// Returns rows per second.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::BenchmarkRun;
    /// use std::time::Duration;
    ///
    /// let run = BenchmarkRun::new(0, Duration::from_secs(2), 1000);
    /// assert!((run.rows_per_second() - 500.0).abs() < 0.001);
    /// ```
    pub fn rows_per_second(&self) -> f64 {
        if self.elapsed.is_zero() {
            0.0
        } else {
            self.rows_mapped as f64 / self.elapsed.as_secs_f64()
        }
    }
}

/// Aggregated results from multiple runs of one strategy on one scenario.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Benchmark name.
    pub name: String,
    /// Strategy under measurement.
    pub strategy_name: String,
    /// Data scenario the strategy ran against.
    pub scenario_name: String,
    /// Individual measured runs.
    pub runs: Vec<BenchmarkRun>,
}

impl BenchmarkResult {
    pub fn new(
        name: impl Into<String>,
        strategy_name: impl Into<String>,
        scenario_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy_name: strategy_name.into(),
            scenario_name: scenario_name.into(),
            runs: Vec::new(),
        }
    }

    pub fn add_run(&mut self, run: BenchmarkRun) {
        self.runs.push(run);
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the average elapsed time.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::{BenchmarkResult, BenchmarkRun};
    /// use std::time::Duration;
    ///
    /// let mut result = BenchmarkResult::new("Test", "probing", "orders");
    /// result.add_run(BenchmarkRun::new(0, Duration::from_millis(100), 10));
    /// result.add_run(BenchmarkRun::new(1, Duration::from_millis(200), 10));
    /// assert_eq!(result.avg_elapsed(), Duration::from_millis(150));
    /// ```
    pub fn avg_elapsed(&self) -> Duration {
        if self.runs.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.runs.iter().map(|r| r.elapsed).sum();
        total / self.runs.len() as u32
    }

    pub fn min_elapsed(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.elapsed)
            .min()
            .unwrap_or(Duration::ZERO)
    }

    pub fn max_elapsed(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.elapsed)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns the fastest run, by elapsed time.
    pub fn best_run(&self) -> Option<&BenchmarkRun> {
        self.runs.iter().min_by_key(|r| r.elapsed)
    }

    pub fn total_rows(&self) -> u64 {
        self.runs.iter().map(|r| r.rows_mapped).sum()
    }

    pub fn avg_rows_per_second(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: f64 = self.runs.iter().map(|r| r.rows_per_second()).sum();
        total / self.runs.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = BenchmarkResult::new("Test", "table", "orders");
        assert_eq!(result.run_count(), 0);
        assert_eq!(result.avg_elapsed(), Duration::ZERO);
        assert!(result.best_run().is_none());
        assert_eq!(result.avg_rows_per_second(), 0.0);
    }

    #[test]
    fn test_aggregates() {
        let mut result = BenchmarkResult::new("Test", "table", "orders");
        result.add_run(BenchmarkRun::new(0, Duration::from_millis(100), 1000));
        result.add_run(BenchmarkRun::new(1, Duration::from_millis(300), 1000));
        assert_eq!(result.min_elapsed(), Duration::from_millis(100));
        assert_eq!(result.max_elapsed(), Duration::from_millis(300));
        assert_eq!(result.avg_elapsed(), Duration::from_millis(200));
        assert_eq!(result.best_run().map(|r| r.run_index), Some(0));
        assert_eq!(result.total_rows(), 2000);
    }

    #[test]
    fn test_zero_elapsed_rate() {
        let run = BenchmarkRun::new(0, Duration::ZERO, 100);
        assert_eq!(run.rows_per_second(), 0.0);
    }
}
