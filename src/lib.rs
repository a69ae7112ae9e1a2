//! @ai:module:intent Per-operator benchmark aggregation and comparison library
//! @ai:module:layer application
//! @ai:module:public_api config, discovery, error, metrics, pipeline, report
//!
//! Reads `root/timings/<operator_type>/<operator>.csv` trees, averages one
//! metric column per operator and compares runs by operator type or by
//! individual operator.

pub mod config;
pub mod discovery;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use metrics::{
    Comparator, Comparison, ComparisonRow, DatasetAggregator, MetricLoader, RankedRow,
};
pub use pipeline::{AnalysisPipeline, FineReport, SingleRunReport};
pub use report::{ChartJob, ReportGenerator};
