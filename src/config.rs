//! @ai:module:intent Configuration structs for the graphing tool
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisConfig, MetricConfig, LabelConfig, OutputConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for an analysis run
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub analysis: MetricConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// @ai:intent Which metric column to read and which files hold it
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricConfig {
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// @ai:intent Human-readable names for the two compared datasets
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_first_label")]
    pub first: String,
    #[serde(default = "default_second_label")]
    pub second: String,
}

/// @ai:intent Where and how charts are written
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_graphs_dir")]
    pub graphs_dir: PathBuf,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    #[serde(default = "default_write_json")]
    pub write_json: bool,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            extension: default_extension(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            first: default_first_label(),
            second: default_second_label(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graphs_dir: default_graphs_dir(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            write_json: default_write_json(),
        }
    }
}

fn default_metric() -> String {
    "task-clock".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_first_label() -> String {
    "Version 1".to_string()
}

fn default_second_label() -> String {
    "Version 2".to_string()
}

fn default_graphs_dir() -> PathBuf {
    PathBuf::from("graphs")
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    600
}

fn default_write_json() -> bool {
    true
}

impl AnalysisConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Reject settings no analysis can run with
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.analysis.metric.trim().is_empty() {
            return Err(Error::Config("metric name must not be empty".to_string()));
        }

        if self.output.chart_width == 0 || self.output.chart_height == 0 {
            return Err(Error::Config(format!(
                "chart size must be non-zero, got {}x{}",
                self.output.chart_width, self.output.chart_height
            )));
        }

        Ok(())
    }

    /// @ai:intent Both dataset labels in order
    /// @ai:effects pure
    pub fn label_pair(&self) -> (&str, &str) {
        (&self.labels.first, &self.labels.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_script_conventions() {
        let config = AnalysisConfig::default();
        assert_eq!(config.analysis.metric, "task-clock");
        assert_eq!(config.analysis.extension, "csv");
        assert_eq!(config.label_pair(), ("Version 1", "Version 2"));
        assert_eq!(config.output.graphs_dir, PathBuf::from("graphs"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("opbench.toml");
        std::fs::write(&path, "[analysis]\nmetric = \"cycles\"\n").unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.analysis.metric, "cycles");
        assert_eq!(config.labels.first, "Version 1");
        assert_eq!(config.output.chart_width, 1000);
    }

    #[test]
    fn test_save_then_load_keeps_labels() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("opbench.toml");

        let mut config = AnalysisConfig::default();
        config.labels.first = "main".to_string();
        config.labels.second = "feature".to_string();
        config.save(&path).unwrap();

        let loaded = AnalysisConfig::load(&path).unwrap();
        assert_eq!(loaded.label_pair(), ("main", "feature"));
    }

    #[test]
    fn test_validate_rejects_empty_metric() {
        let mut config = AnalysisConfig::default();
        config.analysis.metric = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
