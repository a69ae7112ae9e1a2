//! @ai:module:intent Join two aggregated datasets into ordered comparison rows
//! @ai:module:layer domain
//! @ai:module:public_api Comparator, ScopedOutcome, rank
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::metrics::types::{Comparison, ComparisonRow, FineDataset, RankedRow};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// @ai:intent Outcome of comparing one operator type in fine mode
#[derive(Debug)]
pub struct ScopedOutcome {
    pub operator_type: String,
    pub outcome: Result<Comparison>,
}

/// @ai:intent Inner-joins datasets on their keys and orders the result
#[derive(Debug, Clone)]
pub struct Comparator {
    metric: String,
    first_label: String,
    second_label: String,
}

impl Comparator {
    /// @ai:intent Create a comparator for one metric and a pair of dataset labels
    /// @ai:effects pure
    pub fn new(
        metric: impl Into<String>,
        first_label: impl Into<String>,
        second_label: impl Into<String>,
    ) -> Self {
        Self {
            metric: metric.into(),
            first_label: first_label.into(),
            second_label: second_label.into(),
        }
    }

    /// @ai:intent Inner join on key, sorted by the first dataset's value descending
    /// @ai:pre both inputs come from the same aggregation mode
    /// @ai:post rows hold exactly the common keys
    /// @ai:effects pure
    pub fn compare(
        &self,
        first: &BTreeMap<String, f64>,
        second: &BTreeMap<String, f64>,
        scope: Option<&str>,
    ) -> Result<Comparison> {
        if first.is_empty() {
            return Err(self.empty_dataset(&self.first_label));
        }

        if second.is_empty() {
            return Err(self.empty_dataset(&self.second_label));
        }

        let mut rows: Vec<ComparisonRow> = first
            .iter()
            .filter_map(|(key, value_a)| {
                second.get(key).map(|value_b| ComparisonRow {
                    key: key.clone(),
                    value_a: *value_a,
                    value_b: *value_b,
                })
            })
            .collect();

        let only_in_first = keys_missing_from(first, second);
        let only_in_second = keys_missing_from(second, first);

        if rows.is_empty() {
            return Err(Error::NoCommonKeys {
                scope: scope.unwrap_or("operator types").to_string(),
                discarded: only_in_first.len() + only_in_second.len(),
            });
        }

        rows.sort_by(|a, b| descending_then_key(a.value_a, &a.key, b.value_a, &b.key));

        Ok(Comparison {
            scope: scope.map(str::to_string),
            rows,
            only_in_first,
            only_in_second,
        })
    }

    /// @ai:intent Compare each operator type from the union of both datasets
    /// @ai:post one outcome per operator type, in type name order
    /// @ai:effects pure
    pub fn compare_fine(
        &self,
        first: &FineDataset,
        second: &FineDataset,
    ) -> Result<Vec<ScopedOutcome>> {
        if operator_count(first) == 0 {
            return Err(self.empty_dataset(&self.first_label));
        }

        if operator_count(second) == 0 {
            return Err(self.empty_dataset(&self.second_label));
        }

        let empty = BTreeMap::new();
        let op_types: BTreeSet<&String> = first.keys().chain(second.keys()).collect();

        let outcomes = op_types
            .into_iter()
            .map(|op_type| {
                let a = first.get(op_type).unwrap_or(&empty);
                let b = second.get(op_type).unwrap_or(&empty);

                let outcome = if a.is_empty() || b.is_empty() {
                    // one side has nothing to join against
                    Err(Error::NoCommonKeys {
                        scope: op_type.clone(),
                        discarded: a.len() + b.len(),
                    })
                } else {
                    self.compare(a, b, Some(op_type.as_str()))
                };

                ScopedOutcome {
                    operator_type: op_type.clone(),
                    outcome,
                }
            })
            .collect();

        Ok(outcomes)
    }

    fn empty_dataset(&self, label: &str) -> Error {
        Error::EmptyDataset {
            label: label.to_string(),
            metric: self.metric.clone(),
        }
    }
}

/// @ai:intent Order a single dataset for a single-series chart
/// @ai:post sorted by value descending, ties by key ascending
/// @ai:effects pure
pub fn rank(values: &BTreeMap<String, f64>) -> Vec<RankedRow> {
    let mut rows: Vec<RankedRow> = values
        .iter()
        .map(|(key, value)| RankedRow {
            key: key.clone(),
            value: *value,
        })
        .collect();

    rows.sort_by(|a, b| descending_then_key(a.value, &a.key, b.value, &b.key));
    rows
}

/// Equal values (including `-0.0` and `0.0`) tie and fall back to the key.
/// NaN sorts after every number.
fn descending_then_key(a: f64, a_key: &str, b: f64, b_key: &str) -> Ordering {
    let by_value = match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    };

    by_value.then_with(|| a_key.cmp(b_key))
}

fn keys_missing_from(from: &BTreeMap<String, f64>, other: &BTreeMap<String, f64>) -> Vec<String> {
    from.keys()
        .filter(|key| !other.contains_key(*key))
        .cloned()
        .collect()
}

fn operator_count(dataset: &FineDataset) -> usize {
    dataset.values().map(BTreeMap::len).sum()
}
