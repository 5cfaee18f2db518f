//! Report generation for benchmark results.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::result::BenchmarkResult;

/// CSV exporter for benchmark results.
///
/// One row per measured run: run index, elapsed milliseconds, rows mapped,
/// rows per second.
///
/// # Example
///
/// ```
/// use rowforge_benchmark::{BenchmarkResult, CsvExporter};
///
/// let result = BenchmarkResult::new("Test", "table", "orders");
/// let csv = CsvExporter::to_string(&result);
/// assert!(csv.contains("run_index,elapsed_ms"));
/// ```
pub struct CsvExporter;

impl CsvExporter {
    /// Exports a benchmark result to a CSV string.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::{BenchmarkResult, BenchmarkRun, CsvExporter};
    /// use std::time::Duration;
    ///
    /// let mut result = BenchmarkResult::new("Test", "table", "orders");
    /// result.add_run(BenchmarkRun::new(0, Duration::from_millis(100), 1000));
    ///
    /// let csv = CsvExporter::to_string(&result);
    /// assert!(csv.contains("0,100,1000,"));
    /// ```
    pub fn to_string(result: &BenchmarkResult) -> String {
        let mut output = String::new();

        writeln!(output, "run_index,elapsed_ms,rows_mapped,rows_per_second").unwrap();

        for run in &result.runs {
            writeln!(
                output,
                "{},{},{},{:.2}",
                run.run_index,
                run.elapsed.as_millis(),
                run.rows_mapped,
                run.rows_per_second(),
            )
            .unwrap();
        }

        output
    }

    /// Exports a benchmark result to a CSV file.
    pub fn to_file(result: &BenchmarkResult, path: impl AsRef<Path>) -> io::Result<()> {
        let csv = Self::to_string(result);
        fs::write(path, csv)
    }

    /// Writes a benchmark result as CSV to a writer.
    pub fn write<W: Write>(result: &BenchmarkResult, mut writer: W) -> io::Result<()> {
        let csv = Self::to_string(result);
        writer.write_all(csv.as_bytes())
    }
}

/// Markdown report generator.
///
/// Generates human-readable reports with summary statistics and a table of
/// individual runs.
///
/// # Example
///
/// ```
/// use rowforge_benchmark::{BenchmarkResult, MarkdownReport};
///
/// let result = BenchmarkResult::new("Test", "table", "orders");
/// let md = MarkdownReport::to_string(&result);
/// assert!(md.contains("# Benchmark: Test"));
/// ```
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::{BenchmarkResult, BenchmarkRun, MarkdownReport};
    /// use std::time::Duration;
    ///
    /// let mut result = BenchmarkResult::new("Test", "table", "orders");
    /// result.add_run(BenchmarkRun::new(0, Duration::from_millis(100), 1000));
    ///
    /// let md = MarkdownReport::to_string(&result);
    /// assert!(md.contains("## Summary"));
    /// assert!(md.contains("| Run | Time (ms) |"));
    /// ```
    pub fn to_string(result: &BenchmarkResult) -> String {
        let mut output = String::new();

        writeln!(output, "# Benchmark: {}", result.name).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "- **Strategy**: {}", result.strategy_name).unwrap();
        writeln!(output, "- **Scenario**: {}", result.scenario_name).unwrap();
        writeln!(output, "- **Runs**: {}", result.run_count()).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();

        if result.runs.is_empty() {
            writeln!(output, "*No runs completed.*").unwrap();
        } else {
            writeln!(output, "| Metric | Value |").unwrap();
            writeln!(output, "|--------|-------|").unwrap();
            writeln!(
                output,
                "| Avg Time | {:.2} ms |",
                result.avg_elapsed().as_secs_f64() * 1000.0
            )
            .unwrap();
            writeln!(
                output,
                "| Min Time | {:.2} ms |",
                result.min_elapsed().as_secs_f64() * 1000.0
            )
            .unwrap();
            writeln!(
                output,
                "| Max Time | {:.2} ms |",
                result.max_elapsed().as_secs_f64() * 1000.0
            )
            .unwrap();
            writeln!(output, "| Total Rows | {} |", result.total_rows()).unwrap();
            writeln!(
                output,
                "| Avg Rows/sec | {:.0} |",
                result.avg_rows_per_second()
            )
            .unwrap();
        }
        writeln!(output).unwrap();

        if !result.runs.is_empty() {
            writeln!(output, "## Run Details").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Run | Time (ms) | Rows | Rows/sec |").unwrap();
            writeln!(output, "|-----|-----------|------|----------|").unwrap();

            for run in &result.runs {
                writeln!(
                    output,
                    "| {} | {:.2} | {} | {:.0} |",
                    run.run_index,
                    run.elapsed.as_secs_f64() * 1000.0,
                    run.rows_mapped,
                    run.rows_per_second(),
                )
                .unwrap();
            }
        }

        output
    }

    /// Writes the Markdown report to a file.
    pub fn to_file(result: &BenchmarkResult, path: impl AsRef<Path>) -> io::Result<()> {
        let md = Self::to_string(result);
        fs::write(path, md)
    }

    /// Writes the Markdown report to a writer.
    pub fn write<W: Write>(result: &BenchmarkResult, mut writer: W) -> io::Result<()> {
        let md = Self::to_string(result);
        writer.write_all(md.as_bytes())
    }

    /// Generates a comparison table for multiple results.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::{BenchmarkResult, MarkdownReport};
    ///
    /// let probing = BenchmarkResult::new("Test", "probing", "orders");
    /// let table = BenchmarkResult::new("Test", "table", "orders");
    ///
    /// let comparison = MarkdownReport::comparison(&[&probing, &table]);
    /// assert!(comparison.contains("## Comparison"));
    /// ```
    pub fn comparison(results: &[&BenchmarkResult]) -> String {
        let mut output = String::new();

        writeln!(output, "## Comparison").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Strategy | Scenario | Avg Time (ms) | Rows/sec |"
        )
        .unwrap();
        writeln!(
            output,
            "|----------|----------|---------------|----------|"
        )
        .unwrap();

        for result in results {
            writeln!(
                output,
                "| {} | {} | {:.2} | {:.0} |",
                result.strategy_name,
                result.scenario_name,
                result.avg_elapsed().as_secs_f64() * 1000.0,
                result.avg_rows_per_second(),
            )
            .unwrap();
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::BenchmarkRun;
    use std::time::Duration;

    fn sample() -> BenchmarkResult {
        let mut result = BenchmarkResult::new("Orders", "table", "northwind");
        result.add_run(BenchmarkRun::new(0, Duration::from_millis(50), 500));
        result.add_run(BenchmarkRun::new(1, Duration::from_millis(70), 500));
        result
    }

    #[test]
    fn test_csv_shape() {
        let csv = CsvExporter::to_string(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "run_index,elapsed_ms,rows_mapped,rows_per_second");
        assert!(lines[1].starts_with("0,50,500,"));
    }

    #[test]
    fn test_markdown_sections() {
        let md = MarkdownReport::to_string(&sample());
        assert!(md.contains("# Benchmark: Orders"));
        assert!(md.contains("- **Strategy**: table"));
        assert!(md.contains("## Run Details"));
        assert!(md.contains("| Total Rows | 1000 |"));
    }

    #[test]
    fn test_comparison_rows() {
        let a = sample();
        let mut b = sample();
        b.strategy_name = "probing".to_string();
        let comparison = MarkdownReport::comparison(&[&a, &b]);
        assert!(comparison.contains("| table |"));
        assert!(comparison.contains("| probing |"));
    }
}
