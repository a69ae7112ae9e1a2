//! @ai:module:intent Chart and JSON output for comparison results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ChartGenerator, JsonReporter, ChartSpec, ChartData, ChartJob

pub mod charts;
pub mod json_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};

use crate::metrics::{Comparison, RankedRow};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// @ai:intent Presentation metadata for one chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    pub metric: String,
    /// One label per series: two for comparisons, one for rankings.
    pub labels: Vec<String>,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// @ai:intent Ordered rows a chart is drawn from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartData {
    Comparison(Comparison),
    Ranking(Vec<RankedRow>),
}

impl ChartData {
    /// @ai:intent Number of keys along the x axis
    /// @ai:effects pure
    pub fn len(&self) -> usize {
        match self {
            ChartData::Comparison(c) => c.rows.len(),
            ChartData::Ranking(rows) => rows.len(),
        }
    }

    /// @ai:effects pure
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// @ai:intent A chart to render: what to draw and where
#[derive(Debug, Clone, Serialize)]
pub struct ChartJob {
    pub spec: ChartSpec,
    pub data: ChartData,
}

/// @ai:intent Combined chart and JSON sidecar generator
pub struct ReportGenerator {
    json: JsonReporter,
    charts: ChartGenerator,
    write_json: bool,
}

impl ReportGenerator {
    /// @ai:intent Create a report generator
    /// @ai:effects pure
    pub fn new(write_json: bool) -> Self {
        Self {
            json: JsonReporter::new(),
            charts: ChartGenerator::new(),
            write_json,
        }
    }

    /// @ai:intent Render one chart and, when enabled, its JSON sidecar
    /// @ai:effects fs:write
    pub fn generate(&self, job: &ChartJob) -> Result<Vec<PathBuf>> {
        anyhow::ensure!(!job.data.is_empty(), "Nothing to chart for {}", job.spec.title);

        let mut written = vec![self.charts.render(job)?];

        if self.write_json {
            let json_path = job.spec.output_path.with_extension("json");
            self.json.generate(job, &json_path)?;
            written.push(json_path);
        }

        tracing::info!(
            "Saved {} ({} keys) -> {}",
            job.spec.title,
            job.data.len(),
            job.spec.output_path.display()
        );
        Ok(written)
    }

    /// @ai:intent Render every job in order
    /// @ai:effects fs:write
    pub fn generate_all(&self, jobs: &[ChartJob]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for job in jobs {
            written.extend(self.generate(job)?);
        }

        Ok(written)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_rejects_chart_without_keys() {
        let temp = TempDir::new().unwrap();
        let output_path = temp.path().join("optype_totals_cycles.png");

        let job = ChartJob {
            spec: ChartSpec {
                title: "Total cycles by Operator Type".to_string(),
                x_desc: None,
                y_desc: None,
                metric: "cycles".to_string(),
                labels: vec!["timings".to_string()],
                output_path: output_path.clone(),
                width: 400,
                height: 300,
            },
            data: ChartData::Ranking(Vec::new()),
        };

        assert!(job.data.is_empty());
        assert!(ReportGenerator::new(true).generate(&job).is_err());
        assert!(!output_path.exists());
    }
}
