//! @ai:module:intent Record types for aggregated operator metrics
//! @ai:module:layer domain
//! @ai:module:public_api OperatorRecord, OperatorTypeRecord, ComparisonRow, Comparison, RankedRow, CoarseDataset, FineDataset
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operator type to summed metric value.
pub type CoarseDataset = BTreeMap<String, f64>;

/// Operator type to (operator name to averaged metric value).
pub type FineDataset = BTreeMap<String, BTreeMap<String, f64>>;

/// @ai:intent Averaged metric for one operator file within one operator type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub operator_type: String,
    pub operator_name: String,
    pub value: f64,
}

/// @ai:intent Summed metric over all operators of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTypeRecord {
    pub operator_type: String,
    pub value: f64,
}

/// @ai:intent One key present in both compared datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub key: String,
    pub value_a: f64,
    pub value_b: f64,
}

/// @ai:intent One key of a single dataset, ready for a single-series chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub key: String,
    pub value: f64,
}

/// @ai:intent Ordered inner join of two datasets plus the keys it dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Operator type the join was scoped to, `None` for the coarse comparison.
    pub scope: Option<String>,
    pub rows: Vec<ComparisonRow>,
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
}

impl Comparison {
    /// @ai:intent Number of keys excluded by the inner join
    /// @ai:effects pure
    pub fn discarded_count(&self) -> usize {
        self.only_in_first.len() + self.only_in_second.len()
    }

    /// @ai:intent Human-readable name of the comparison scope
    /// @ai:effects pure
    pub fn scope_name(&self) -> &str {
        self.scope.as_deref().unwrap_or("operator types")
    }
}

impl OperatorRecord {
    /// @ai:intent Flatten a fine dataset into records, ordered by type then operator
    /// @ai:effects pure
    pub fn from_fine(dataset: &FineDataset) -> Vec<OperatorRecord> {
        dataset
            .iter()
            .flat_map(|(operator_type, operators)| {
                operators.iter().map(move |(name, value)| OperatorRecord {
                    operator_type: operator_type.clone(),
                    operator_name: name.clone(),
                    value: *value,
                })
            })
            .collect()
    }
}

impl OperatorTypeRecord {
    /// @ai:intent Turn a coarse dataset into records, ordered by type
    /// @ai:effects pure
    pub fn from_coarse(dataset: &CoarseDataset) -> Vec<OperatorTypeRecord> {
        dataset
            .iter()
            .map(|(operator_type, value)| OperatorTypeRecord {
                operator_type: operator_type.clone(),
                value: *value,
            })
            .collect()
    }
}
