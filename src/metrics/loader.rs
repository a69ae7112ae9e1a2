//! @ai:module:intent Load one operator type's CSV files and average a metric column
//! @ai:module:layer infrastructure
//! @ai:module:public_api MetricLoader, MetricLoaderTrait, MissingDirectory
//! @ai:module:stateless true

use crate::discovery::{list_entries, EntryKind};
use crate::error::{Error, Result};
use crate::metrics::table::MetricTable;
use std::collections::BTreeMap;
use std::path::Path;

/// @ai:intent What loading does when the operator-type directory is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDirectory {
    /// Treat the directory as holding no operators (bulk discovery).
    Empty,
    /// Fail with `Error::NotFound` (directory requested explicitly).
    Fail,
}

/// @ai:intent Trait for loading averaged metrics per operator
pub trait MetricLoaderTrait: Send + Sync {
    /// @ai:intent Map operator name to mean of the metric column
    fn load(
        &self,
        directory: &Path,
        metric: &str,
        missing: MissingDirectory,
    ) -> Result<BTreeMap<String, f64>>;
}

/// @ai:intent Loads per-operator averages from CSV sample files
pub struct MetricLoader {
    extension: String,
}

impl MetricLoader {
    /// @ai:intent Create a loader reading `.csv` files
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::with_extension("csv")
    }

    /// @ai:intent Create a loader reading files with another extension
    /// @ai:effects pure
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// @ai:intent Mean of one file's metric column, `None` when the file lacks the column
    /// @ai:post NaN when the column exists but holds no numeric samples
    /// @ai:effects fs:read
    fn average_file(path: &Path, metric: &str) -> Result<Option<f64>> {
        let table = match MetricTable::from_path(path) {
            Ok(table) => table,
            Err(e @ Error::Csv { .. }) => {
                tracing::warn!("Skipping malformed table {}: {}", path.display(), e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !table.has_column(metric) {
            tracing::debug!("{} has no '{}' column", path.display(), metric);
            return Ok(None);
        }

        let samples = table.column_values(metric);
        if samples.is_empty() {
            tracing::debug!(
                "{} has no numeric '{}' samples in {} rows",
                path.display(),
                metric,
                table.row_count()
            );
            return Ok(Some(f64::NAN));
        }

        Ok(Some(mean(&samples)))
    }
}

impl Default for MetricLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Arithmetic mean of a non-empty slice
/// @ai:pre values is not empty
/// @ai:effects pure
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl MetricLoaderTrait for MetricLoader {
    /// @ai:intent Average the metric for each file that has the column
    /// @ai:post keys are file stems of files containing the metric
    /// @ai:effects fs:read
    fn load(
        &self,
        directory: &Path,
        metric: &str,
        missing: MissingDirectory,
    ) -> Result<BTreeMap<String, f64>> {
        if !directory.is_dir() {
            return match missing {
                MissingDirectory::Empty => {
                    tracing::debug!("No directory found at {}", directory.display());
                    Ok(BTreeMap::new())
                }
                MissingDirectory::Fail => Err(Error::NotFound {
                    path: directory.to_path_buf(),
                }),
            };
        }

        let mut averages = BTreeMap::new();

        for file in list_entries(directory, EntryKind::File)? {
            if !file.has_extension(&self.extension) {
                continue;
            }

            if let Some(value) = Self::average_file(&file.path, metric)? {
                averages.insert(file.stem().to_string(), value);
            }
        }

        Ok(averages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_average_of_three_rows() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "op1.csv", "cycles\n1.0\n2.0\n3.0\n");

        let loaded = MetricLoader::new()
            .load(temp.path(), "cycles", MissingDirectory::Fail)
            .unwrap();
        assert_eq!(loaded, BTreeMap::from([("op1".to_string(), 2.0)]));
    }

    #[test]
    fn test_keys_are_files_with_metric() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "add.csv", "cycles,seconds\n10,1\n20,1\n");
        write(temp.path(), "mul.csv", "seconds\n1\n");
        write(temp.path(), "sub.csv", "cycles\n5\n");
        write(temp.path(), "readme.txt", "cycles\n100\n");

        let loaded = MetricLoader::new()
            .load(temp.path(), "cycles", MissingDirectory::Empty)
            .unwrap();
        assert_eq!(
            loaded,
            BTreeMap::from([("add".to_string(), 15.0), ("sub".to_string(), 5.0)])
        );
    }

    #[test]
    fn test_missing_directory_policies() {
        let temp = TempDir::new().unwrap();
        let absent = temp.path().join("conv");
        let loader = MetricLoader::new();

        let empty = loader
            .load(&absent, "cycles", MissingDirectory::Empty)
            .unwrap();
        assert!(empty.is_empty());

        let err = loader
            .load(&absent, "cycles", MissingDirectory::Fail)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_column_without_samples_keeps_key_as_nan() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "empty.csv", "cycles\n");
        write(temp.path(), "text.csv", "cycles\nn/a\n");
        write(temp.path(), "full.csv", "cycles\n4\n");

        let loaded = MetricLoader::new()
            .load(temp.path(), "cycles", MissingDirectory::Fail)
            .unwrap();
        assert_eq!(
            loaded.keys().collect::<Vec<_>>(),
            vec!["empty", "full", "text"]
        );
        assert!(loaded["empty"].is_nan());
        assert!(loaded["text"].is_nan());
        assert_eq!(loaded["full"], 4.0);
    }

    #[test]
    fn test_malformed_table_is_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bad.csv"), b"cycles\n\xff\xfe\n").unwrap();
        write(temp.path(), "good.csv", "cycles\n2\n");

        let loaded = MetricLoader::new()
            .load(temp.path(), "cycles", MissingDirectory::Fail)
            .unwrap();
        assert_eq!(loaded, BTreeMap::from([("good".to_string(), 2.0)]));
    }

    #[test]
    fn test_unopenable_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone.csv");

        let err = MetricLoader::average_file(&gone, "cycles").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_custom_extension() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "op.tsvx", "cycles\n9\n");
        write(temp.path(), "op2.csv", "cycles\n1\n");

        let loaded = MetricLoader::with_extension("tsvx")
            .load(temp.path(), "cycles", MissingDirectory::Fail)
            .unwrap();
        assert_eq!(loaded, BTreeMap::from([("op".to_string(), 9.0)]));
    }

    #[test]
    fn test_mean() {
        assert!((mean(&[10.0, 20.0, 30.0]) - 20.0).abs() < 1e-12);
    }
}
