//! Benchmark configuration.

use std::path::Path;

use serde::Deserialize;

use rowforge_core::{Result, RowForgeError};

/// Configuration for a benchmark run.
///
/// Controls warmup iterations, measurement runs, and optional output paths.
/// Built fluently or deserialized from TOML.
///
/// # Example
///
/// ```
/// use rowforge_benchmark::BenchmarkConfig;
///
/// let config = BenchmarkConfig::new("Order Mapping")
///     .with_warmup_count(3)
///     .with_run_count(10);
///
/// assert_eq!(config.name(), "Order Mapping");
/// assert_eq!(config.warmup_count(), 3);
/// assert_eq!(config.run_count(), 10);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    name: String,
    warmup_count: usize,
    run_count: usize,
    csv_output_path: Option<String>,
    markdown_output_path: Option<String>,
}

impl BenchmarkConfig {
    /// Creates a new benchmark configuration with the given name.
    ///
    /// Defaults:
    /// - warmup_count: 1
    /// - run_count: 3
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warmup_count: 1,
            run_count: 3,
            csv_output_path: None,
            markdown_output_path: None,
        }
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Example
    ///
    /// ```
    /// use rowforge_benchmark::BenchmarkConfig;
    ///
    /// let config = BenchmarkConfig::from_toml_str(
    ///     "name = \"Orders\"\nwarmup_count = 2\nrun_count = 5\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.name(), "Orders");
    /// assert_eq!(config.run_count(), 5);
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|e| RowForgeError::Internal(format!("benchmark config parse: {e}")))
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RowForgeError::Internal(format!(
                "benchmark config read '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Sets the number of warmup iterations (not measured).
    pub fn with_warmup_count(mut self, count: usize) -> Self {
        self.warmup_count = count;
        self
    }

    /// Sets the number of measurement runs.
    pub fn with_run_count(mut self, count: usize) -> Self {
        self.run_count = count;
        self
    }

    /// Sets the output path for CSV export.
    pub fn with_csv_output(mut self, path: impl Into<String>) -> Self {
        self.csv_output_path = Some(path.into());
        self
    }

    /// Sets the output path for the Markdown report.
    pub fn with_markdown_output(mut self, path: impl Into<String>) -> Self {
        self.markdown_output_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn warmup_count(&self) -> usize {
        self.warmup_count
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn csv_output_path(&self) -> Option<&str> {
        self.csv_output_path.as_deref()
    }

    pub fn markdown_output_path(&self) -> Option<&str> {
        self.markdown_output_path.as_deref()
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::new("Benchmark")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.warmup_count(), 1);
        assert_eq!(config.run_count(), 3);
        assert!(config.csv_output_path().is_none());
    }

    #[test]
    fn test_toml_round() {
        let config = BenchmarkConfig::from_toml_str(
            r#"
name = "Order Mapping"
warmup_count = 4
run_count = 8
csv_output_path = "results.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.name(), "Order Mapping");
        assert_eq!(config.warmup_count(), 4);
        assert_eq!(config.run_count(), 8);
        assert_eq!(config.csv_output_path(), Some("results.csv"));
        assert!(config.markdown_output_path().is_none());
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = BenchmarkConfig::from_toml_str("name = \"X\"\n").unwrap();
        assert_eq!(config.name(), "X");
        assert_eq!(config.run_count(), 3);
    }

    #[test]
    fn test_toml_invalid() {
        assert!(BenchmarkConfig::from_toml_str("run_count = \"many\"").is_err());
    }
}
