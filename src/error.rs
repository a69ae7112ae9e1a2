//! @ai:module:intent Define error types for loading and comparing benchmark datasets
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for discovery, loading and comparison
#[derive(Error, Debug)]
pub enum Error {
    #[error("Directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Missing '{layer}' directory in: {}", root.display())]
    MissingLayout { root: PathBuf, layer: String },

    #[error("Dataset '{label}' has no usable rows for metric '{metric}'")]
    EmptyDataset { label: String, metric: String },

    #[error("No common keys to compare in {scope} ({discarded} keys discarded)")]
    NoCommonKeys { scope: String, discarded: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// @ai:intent Whether the error describes sparse data rather than a broken input layout
    /// @ai:effects pure
    pub fn is_data_sparsity(&self) -> bool {
        matches!(self, Error::EmptyDataset { .. } | Error::NoCommonKeys { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
