//! @ai:module:intent Wire loading, aggregation and comparison into chart jobs
//! @ai:module:layer application
//! @ai:module:public_api AnalysisPipeline, FineReport, SingleRunReport
//! @ai:module:depends_on metrics, report

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::metrics::{
    coarsen, rank, Comparator, DatasetAggregator, DatasetAggregatorTrait, MetricLoader,
    OperatorRecord, OperatorTypeRecord,
};
use crate::report::{ChartData, ChartJob, ChartSpec};
use std::path::{Path, PathBuf};

/// @ai:intent Charts produced by the per-operator-type comparison plus the types left out
#[derive(Debug)]
pub struct FineReport {
    pub jobs: Vec<ChartJob>,
    pub skipped: Vec<(String, Error)>,
}

/// @ai:intent Charts produced from a single benchmark run
#[derive(Debug)]
pub struct SingleRunReport {
    pub files_loaded: usize,
    pub jobs: Vec<ChartJob>,
}

/// @ai:intent Runs the four analyses with one explicit configuration
pub struct AnalysisPipeline<'a> {
    config: &'a AnalysisConfig,
    aggregator: DatasetAggregator,
}

impl<'a> AnalysisPipeline<'a> {
    /// @ai:intent Create a pipeline reading files with the configured extension
    /// @ai:effects pure
    pub fn new(config: &'a AnalysisConfig) -> Self {
        let loader = MetricLoader::with_extension(config.analysis.extension.clone());

        Self {
            config,
            aggregator: DatasetAggregator::with_loader(loader),
        }
    }

    fn metric(&self) -> &str {
        &self.config.analysis.metric
    }

    fn comparator(&self) -> Comparator {
        let (first, second) = self.config.label_pair();
        Comparator::new(self.metric(), first, second)
    }

    fn spec(&self, title: String, output_path: PathBuf, labels: Vec<String>) -> ChartSpec {
        ChartSpec {
            title,
            x_desc: None,
            y_desc: None,
            metric: self.metric().to_string(),
            labels,
            output_path,
            width: self.config.output.chart_width,
            height: self.config.output.chart_height,
        }
    }

    fn comparison_labels(&self) -> Vec<String> {
        let (first, second) = self.config.label_pair();
        vec![first.to_string(), second.to_string()]
    }

    /// @ai:intent Compare summed operator-type totals of two benchmark roots
    /// @ai:pre both roots contain a timings directory
    /// @ai:effects fs:read
    pub fn compare_operator_types(&self, first_root: &Path, second_root: &Path) -> Result<ChartJob> {
        let metric = self.metric();

        // both layouts are checked before either dataset is read
        crate::discovery::timings_dir(first_root)?;
        crate::discovery::timings_dir(second_root)?;

        let first = self.aggregator.coarse(first_root, metric)?;
        let second = self.aggregator.coarse(second_root, metric)?;

        let comparison = self.comparator().compare(&first, &second, None)?;

        tracing::info!(
            "Compared {} operator types ({} discarded)",
            comparison.rows.len(),
            comparison.discarded_count()
        );

        let mut spec = self.spec(
            format!("Inter-OpType Comparison ({metric})"),
            self.config
                .output
                .graphs_dir
                .join(format!("inter_optype_comparison_{metric}.png")),
            self.comparison_labels(),
        );
        spec.y_desc = Some(format!("Total {metric}"));

        Ok(ChartJob {
            spec,
            data: ChartData::Comparison(comparison),
        })
    }

    /// @ai:intent Compare individual operators of two roots, one chart per operator type
    /// @ai:post every operator type of either root is either charted or skipped
    /// @ai:effects fs:read
    pub fn compare_operators(&self, first_root: &Path, second_root: &Path) -> Result<FineReport> {
        let metric = self.metric();

        crate::discovery::timings_dir(first_root)?;
        crate::discovery::timings_dir(second_root)?;

        let first = self.aggregator.fine(first_root, metric)?;
        let second = self.aggregator.fine(second_root, metric)?;

        let mut report = FineReport {
            jobs: Vec::new(),
            skipped: Vec::new(),
        };

        for scoped in self.comparator().compare_fine(&first, &second)? {
            let op_type = scoped.operator_type;

            match scoped.outcome {
                Ok(comparison) => {
                    let mut spec = self.spec(
                        format!("Intra-OpType Comparison for '{op_type}' ({metric})"),
                        self.config
                            .output
                            .graphs_dir
                            .join(&op_type)
                            .join(format!("{op_type}_intra_{metric}.png")),
                        self.comparison_labels(),
                    );
                    spec.y_desc = Some(format!("Average {metric}"));

                    report.jobs.push(ChartJob {
                        spec,
                        data: ChartData::Comparison(comparison),
                    });
                }
                Err(e) if e.is_data_sparsity() => {
                    tracing::warn!("No common operators in {} to compare: {}", op_type, e);
                    report.skipped.push((op_type, e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// @ai:intent Total metric per operator type within one timings directory
    /// @ai:effects fs:read
    pub fn operator_type_totals(&self, timings: &Path) -> Result<SingleRunReport> {
        let metric = self.metric();
        let fine = self.aggregator.fine_from_timings(timings, metric)?;
        let files_loaded = OperatorRecord::from_fine(&fine).len();

        let totals = coarsen(&fine);
        if totals.is_empty() {
            return Err(self.empty_run(timings));
        }

        for record in OperatorTypeRecord::from_coarse(&totals) {
            tracing::debug!("{} total {} = {}", record.operator_type, metric, record.value);
        }

        let mut spec = self.spec(
            format!("Total {metric} by Operator Type"),
            self.config
                .output
                .graphs_dir
                .join(format!("optype_totals_{metric}.png")),
            vec![timings.display().to_string()],
        );
        spec.x_desc = Some("Operator Type".to_string());
        spec.y_desc = Some(format!("Total {metric}"));

        Ok(SingleRunReport {
            files_loaded,
            jobs: vec![ChartJob {
                spec,
                data: ChartData::Ranking(rank(&totals)),
            }],
        })
    }

    /// @ai:intent Average metric per operator, one chart per operator type
    /// @ai:effects fs:read
    pub fn operators_by_type(&self, timings: &Path) -> Result<SingleRunReport> {
        let metric = self.metric();
        let fine = self.aggregator.fine_from_timings(timings, metric)?;
        let files_loaded = OperatorRecord::from_fine(&fine).len();

        let mut jobs = Vec::new();

        for (op_type, operators) in &fine {
            if operators.is_empty() {
                tracing::debug!("No '{}' data found for {}", metric, op_type);
                continue;
            }

            let mut spec = self.spec(
                format!("Comparison of {metric} within '{op_type}'"),
                self.config
                    .output
                    .graphs_dir
                    .join(op_type)
                    .join(format!("{op_type}_operators_{metric}.png")),
                vec![op_type.clone()],
            );
            spec.x_desc = Some("Operator (File ID)".to_string());
            spec.y_desc = Some(format!("Average {metric}"));

            jobs.push(ChartJob {
                spec,
                data: ChartData::Ranking(rank(operators)),
            });
        }

        if jobs.is_empty() {
            return Err(self.empty_run(timings));
        }

        Ok(SingleRunReport { files_loaded, jobs })
    }

    fn empty_run(&self, timings: &Path) -> Error {
        Error::EmptyDataset {
            label: timings.display().to_string(),
            metric: self.metric().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ComparisonRow;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_op(root: &Path, op_type: &str, op: &str, content: &str) {
        let dir = root.join("timings").join(op_type);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{op}.csv")), content).unwrap();
    }

    fn config(metric: &str, graphs: &Path) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.analysis.metric = metric.to_string();
        config.output.graphs_dir = graphs.to_path_buf();
        config
    }

    fn comparison_rows(job: &ChartJob) -> Vec<ComparisonRow> {
        match &job.data {
            ChartData::Comparison(c) => c.rows.clone(),
            ChartData::Ranking(_) => panic!("expected a comparison"),
        }
    }

    #[test]
    fn test_compare_operator_types_end_to_end() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_op(&a, "conv", "k1", "cycles\n6\n");
        write_op(&a, "conv", "k2", "cycles\n4\n");
        write_op(&a, "pool", "max", "cycles\n4\n");
        write_op(&b, "conv", "k1", "cycles\n8\n");
        write_op(&b, "norm", "ln", "cycles\n2\n");

        let config = config("cycles", &temp.path().join("graphs"));
        let job = AnalysisPipeline::new(&config)
            .compare_operator_types(&a, &b)
            .unwrap();

        assert_eq!(
            comparison_rows(&job),
            vec![ComparisonRow {
                key: "conv".to_string(),
                value_a: 10.0,
                value_b: 8.0
            }]
        );
        assert_eq!(job.spec.title, "Inter-OpType Comparison (cycles)");
        assert_eq!(
            job.spec.output_path,
            temp.path()
                .join("graphs")
                .join("inter_optype_comparison_cycles.png")
        );
    }

    #[test]
    fn test_missing_layout_is_reported_for_second_root() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_op(&a, "conv", "k1", "cycles\n6\n");
        std::fs::create_dir_all(&b).unwrap();

        let config = config("cycles", temp.path());
        let err = AnalysisPipeline::new(&config)
            .compare_operator_types(&a, &b)
            .unwrap_err();
        assert!(matches!(err, Error::MissingLayout { root, .. } if root == b));
    }

    #[test]
    fn test_compare_operators_skips_types_without_overlap() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_op(&a, "conv", "op1", "cycles\n5\n");
        write_op(&a, "conv", "op2", "cycles\n3\n");
        write_op(&a, "pool", "max", "cycles\n1\n");
        write_op(&b, "conv", "op1", "cycles\n4\n");
        write_op(&b, "conv", "op3", "cycles\n1\n");
        write_op(&b, "pool", "avg", "cycles\n1\n");

        let config = config("cycles", &temp.path().join("graphs"));
        let report = AnalysisPipeline::new(&config)
            .compare_operators(&a, &b)
            .unwrap();

        assert_eq!(report.jobs.len(), 1);
        assert_eq!(
            comparison_rows(&report.jobs[0]),
            vec![ComparisonRow {
                key: "op1".to_string(),
                value_a: 5.0,
                value_b: 4.0
            }]
        );
        assert_eq!(
            report.jobs[0].spec.output_path,
            temp.path()
                .join("graphs")
                .join("conv")
                .join("conv_intra_cycles.png")
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "pool");
        assert!(report.skipped[0].1.is_data_sparsity());
    }

    #[test]
    fn test_single_type_without_metric_is_empty_dataset() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_op(&a, "conv", "op1", "seconds\n5\n");
        write_op(&b, "conv", "op1", "cycles\n5\n");

        let config = config("cycles", temp.path());
        let pipeline = AnalysisPipeline::new(&config);

        let coarse = pipeline.compare_operator_types(&a, &b).unwrap_err();
        assert!(matches!(coarse, Error::EmptyDataset { .. }));

        let fine = pipeline.compare_operators(&a, &b).unwrap_err();
        assert!(matches!(fine, Error::EmptyDataset { .. }));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        for (i, op) in ["relu", "gelu", "tanh", "silu"].iter().enumerate() {
            write_op(&a, "act", op, &format!("cycles\n{}\n{}\n", i, i * 3));
            write_op(&b, "act", op, &format!("cycles\n{}\n", i * 2));
        }

        let config = config("cycles", temp.path());
        let pipeline = AnalysisPipeline::new(&config);
        let first = pipeline.compare_operators(&a, &b).unwrap();
        let second = pipeline.compare_operators(&a, &b).unwrap();

        let rows = |r: &FineReport| -> Vec<(String, u64, u64)> {
            r.jobs
                .iter()
                .flat_map(comparison_rows)
                .map(|row| (row.key, row.value_a.to_bits(), row.value_b.to_bits()))
                .collect()
        };
        assert_eq!(rows(&first), rows(&second));
    }

    #[test]
    fn test_operator_type_totals_ranks_descending() {
        let temp = TempDir::new().unwrap();
        write_op(temp.path(), "conv", "k1", "cycles\n1\n3\n");
        write_op(temp.path(), "gemm", "g", "cycles\n9\n");
        write_op(temp.path(), "misc", "x", "seconds\n1\n");

        let config = config("cycles", &temp.path().join("graphs"));
        let report = AnalysisPipeline::new(&config)
            .operator_type_totals(&temp.path().join("timings"))
            .unwrap();

        assert_eq!(report.files_loaded, 2);
        match &report.jobs[0].data {
            ChartData::Ranking(rows) => {
                let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
                assert_eq!(keys, vec!["gemm", "conv"]);
            }
            ChartData::Comparison(_) => panic!("expected a ranking"),
        }
    }

    #[test]
    fn test_operator_type_totals_keep_types_without_samples() {
        let temp = TempDir::new().unwrap();
        write_op(temp.path(), "conv", "k1", "cycles\n2\n");
        write_op(temp.path(), "pool", "max", "cycles\n");

        let config = config("cycles", &temp.path().join("graphs"));
        let report = AnalysisPipeline::new(&config)
            .operator_type_totals(&temp.path().join("timings"))
            .unwrap();

        assert_eq!(report.files_loaded, 2);
        match &report.jobs[0].data {
            ChartData::Ranking(rows) => {
                let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
                assert_eq!(keys, vec!["conv", "pool"]);
                assert_eq!(rows[1].value, 0.0);
            }
            ChartData::Comparison(_) => panic!("expected a ranking"),
        }
    }

    #[test]
    fn test_operators_by_type_requires_existing_timings_dir() {
        let temp = TempDir::new().unwrap();
        let config = config("cycles", temp.path());

        let err = AnalysisPipeline::new(&config)
            .operators_by_type(&temp.path().join("timings"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_operators_by_type_one_job_per_populated_type() {
        let temp = TempDir::new().unwrap();
        write_op(temp.path(), "conv", "k1", "cycles\n1\n");
        write_op(temp.path(), "pool", "max", "seconds\n1\n");

        let config = config("cycles", &temp.path().join("graphs"));
        let report = AnalysisPipeline::new(&config)
            .operators_by_type(&temp.path().join("timings"))
            .unwrap();

        assert_eq!(report.jobs.len(), 1);
        assert_eq!(report.jobs[0].spec.title, "Comparison of cycles within 'conv'");
    }
}
