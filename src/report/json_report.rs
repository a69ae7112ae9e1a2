//! @ai:module:intent JSON sidecar generation for rendered charts
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::report::{ChartData, ChartJob};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// @ai:intent Trait for JSON sidecar generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the rows behind a chart as JSON
    fn generate(&self, job: &ChartJob, output_path: &Path) -> Result<()>;
}

#[derive(Serialize)]
struct Sidecar<'a> {
    generated_at: String,
    title: &'a str,
    metric: &'a str,
    labels: &'a [String],
    #[serde(flatten)]
    data: &'a ChartData,
}

/// @ai:intent Writes comparison and ranking rows next to their chart
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON sidecar to file
    /// @ai:effects fs:write
    fn generate(&self, job: &ChartJob, output_path: &Path) -> Result<()> {
        let sidecar = Sidecar {
            generated_at: chrono::Utc::now().to_rfc3339(),
            title: &job.spec.title,
            metric: &job.spec.metric,
            labels: &job.spec.labels,
            data: &job.data,
        };

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&sidecar)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Comparison, ComparisonRow};
    use crate::report::ChartSpec;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_sidecar() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conv").join("conv_intra_cycles.json");

        let job = ChartJob {
            spec: ChartSpec {
                title: "Intra-OpType Comparison for 'conv' (cycles)".to_string(),
                x_desc: None,
                y_desc: Some("Average cycles".to_string()),
                metric: "cycles".to_string(),
                labels: vec!["Version 1".to_string(), "Version 2".to_string()],
                output_path: temp.path().join("conv").join("conv_intra_cycles.png"),
                width: 1000,
                height: 600,
            },
            data: ChartData::Comparison(Comparison {
                scope: Some("conv".to_string()),
                rows: vec![ComparisonRow {
                    key: "op1".to_string(),
                    value_a: 5.0,
                    value_b: 4.0,
                }],
                only_in_first: vec!["op2".to_string()],
                only_in_second: vec!["op3".to_string()],
            }),
        };

        reporter.generate(&job, &output).unwrap();
        assert!(output.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["metric"], "cycles");
        assert_eq!(value["comparison"]["rows"][0]["key"], "op1");
        assert_eq!(value["comparison"]["only_in_second"][0], "op3");
    }
}
