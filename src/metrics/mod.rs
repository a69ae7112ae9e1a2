//! @ai:module:intent Metric loading, aggregation and comparison
//! @ai:module:layer application
//! @ai:module:public_api MetricTable, MetricLoader, DatasetAggregator, Comparator, Comparison, ComparisonRow, RankedRow

pub mod aggregator;
pub mod comparator;
pub mod loader;
pub mod table;
pub mod types;

pub use aggregator::{coarsen, DatasetAggregator, DatasetAggregatorTrait};
pub use comparator::{rank, Comparator, ScopedOutcome};
pub use loader::{MetricLoader, MetricLoaderTrait, MissingDirectory};
pub use table::MetricTable;
pub use types::{
    CoarseDataset, Comparison, ComparisonRow, FineDataset, OperatorRecord, OperatorTypeRecord,
    RankedRow,
};
