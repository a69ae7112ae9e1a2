//! @ai:module:intent Aggregate operator averages across a benchmark output tree
//! @ai:module:layer application
//! @ai:module:public_api DatasetAggregator, DatasetAggregatorTrait, coarsen
//! @ai:module:stateless true

use crate::discovery::{list_entries, timings_dir, EntryKind};
use crate::error::{Error, Result};
use crate::metrics::loader::{MetricLoader, MetricLoaderTrait, MissingDirectory};
use crate::metrics::types::{CoarseDataset, FineDataset};
use std::path::Path;

/// @ai:intent Trait for building datasets from a benchmark root
pub trait DatasetAggregatorTrait: Send + Sync {
    /// @ai:intent Per-operator averages grouped by operator type
    fn fine(&self, root: &Path, metric: &str) -> Result<FineDataset>;

    /// @ai:intent Summed averages per operator type
    fn coarse(&self, root: &Path, metric: &str) -> Result<CoarseDataset>;
}

/// @ai:intent Runs the metric loader over every operator-type directory
pub struct DatasetAggregator<L: MetricLoaderTrait = MetricLoader> {
    loader: L,
}

impl DatasetAggregator<MetricLoader> {
    /// @ai:intent Create an aggregator backed by the CSV loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::with_loader(MetricLoader::new())
    }
}

impl Default for DatasetAggregator<MetricLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: MetricLoaderTrait> DatasetAggregator<L> {
    /// @ai:intent Create an aggregator with a custom loader
    /// @ai:effects pure
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// @ai:intent Names of the operator-type directories under a timings directory
    /// @ai:effects fs:read
    pub fn operator_types(&self, timings: &Path) -> Result<Vec<String>> {
        if !timings.is_dir() {
            return Err(Error::NotFound {
                path: timings.to_path_buf(),
            });
        }

        Ok(list_entries(timings, EntryKind::Directory)?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// @ai:intent Fine dataset read directly from a timings directory
    /// @ai:post every discovered operator type is a key, possibly with no operators
    /// @ai:effects fs:read
    pub fn fine_from_timings(&self, timings: &Path, metric: &str) -> Result<FineDataset> {
        let mut dataset = FineDataset::new();

        for op_type in self.operator_types(timings)? {
            let operators =
                self.loader
                    .load(&timings.join(&op_type), metric, MissingDirectory::Empty)?;

            tracing::debug!(
                "Loaded {} operators with '{}' from {}",
                operators.len(),
                metric,
                op_type
            );
            dataset.insert(op_type, operators);
        }

        Ok(dataset)
    }
}

/// @ai:intent Sum each operator type's values, dropping types with no operators
/// @ai:post NaN operator values are left out of the sum
/// @ai:effects pure
pub fn coarsen(fine: &FineDataset) -> CoarseDataset {
    fine.iter()
        .filter(|(_, operators)| !operators.is_empty())
        .map(|(op_type, operators)| {
            let total = operators.values().filter(|v| !v.is_nan()).sum::<f64>();
            (op_type.clone(), total)
        })
        .collect()
}

impl<L: MetricLoaderTrait> DatasetAggregatorTrait for DatasetAggregator<L> {
    /// @ai:intent Check the layout, then load every operator type
    /// @ai:effects fs:read
    fn fine(&self, root: &Path, metric: &str) -> Result<FineDataset> {
        let timings = timings_dir(root)?;
        self.fine_from_timings(&timings, metric)
    }

    /// @ai:effects fs:read
    fn coarse(&self, root: &Path, metric: &str) -> Result<CoarseDataset> {
        Ok(coarsen(&self.fine(root, metric)?))
    }
}
