//! @ai:module:intent Typed view over one CSV file of samples
//! @ai:module:layer infrastructure
//! @ai:module:public_api MetricTable
//! @ai:module:stateless true

use crate::error::{Error, Result};
use csv::StringRecord;
use std::io::Read;
use std::path::Path;

/// @ai:intent Header plus rows of one samples file, looked up by column name
#[derive(Debug, Clone)]
pub struct MetricTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl MetricTable {
    /// @ai:intent Read a table from a CSV file with a header row
    /// @ai:effects fs:read
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file).map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:intent Read a table from any CSV byte source
    /// @ai:effects io
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    /// @ai:effects pure
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// @ai:intent Numeric values of a column, skipping blank and non-numeric cells
    /// @ai:post empty when the column is absent
    /// @ai:effects pure
    pub fn column_values(&self, name: &str) -> Vec<f64> {
        let Some(index) = self.column_index(name) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter_map(|cell| cell.parse::<f64>().ok())
            .filter(|value| !value.is_nan())
            .collect()
    }

    /// @ai:effects pure
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
