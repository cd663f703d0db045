//! The append-only indicator value table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::indicator::{IndicatorKind, Measurement};

/// Coordinates of one indicator cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub indicator: IndicatorKind,
    pub problem: String,
    pub algorithm: String,
    pub run: usize,
}

/// One row of the table, as written to reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    #[serde(flatten)]
    pub key: CellKey,
    pub value: Measurement,
}

/// Indicator values keyed by (indicator, problem, algorithm, run).
///
/// Cells can be added but never replaced; iteration order is the key order,
/// so two tables with the same cells iterate identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    cells: BTreeMap<CellKey, Measurement>,
}

impl IndicatorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell; fails if the key is already present.
    pub fn insert(&mut self, key: CellKey, value: Measurement) -> Result<(), EvalError> {
        use std::collections::btree_map::Entry;
        match self.cells.entry(key) {
            Entry::Occupied(e) => {
                let k = e.key();
                Err(EvalError::DuplicateEntry(format!(
                    "{} / {} / {} / run {}",
                    k.indicator, k.problem, k.algorithm, k.run
                )))
            }
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &CellKey) -> Option<Measurement> {
        self.cells.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells for one (indicator, problem) pair.
    #[must_use]
    pub fn count(&self, indicator: IndicatorKind, problem: &str) -> usize {
        self.iter()
            .filter(|(k, _)| k.indicator == indicator && k.problem == problem)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, Measurement)> {
        self.cells.iter().map(|(k, v)| (k, *v))
    }

    /// Distinct indicators present, in catalog order.
    #[must_use]
    pub fn indicators(&self) -> Vec<IndicatorKind> {
        let mut kinds: Vec<IndicatorKind> = self.cells.keys().map(|k| k.indicator).collect();
        kinds.dedup();
        kinds
    }

    /// Defined values of one (indicator, problem, algorithm) group by run.
    #[must_use]
    pub fn defined_by_run(
        &self,
        indicator: IndicatorKind,
        problem: &str,
        algorithm: &str,
    ) -> BTreeMap<usize, f64> {
        self.iter()
            .filter(|(k, _)| {
                k.indicator == indicator && k.problem == problem && k.algorithm == algorithm
            })
            .filter_map(|(k, m)| m.value().map(|v| (k.run, v)))
            .collect()
    }

    /// Defined values of one group in run order.
    #[must_use]
    pub fn samples(&self, indicator: IndicatorKind, problem: &str, algorithm: &str) -> Vec<f64> {
        self.defined_by_run(indicator, problem, algorithm)
            .into_values()
            .collect()
    }

    /// Every cell as a serializable row, in key order.
    #[must_use]
    pub fn rows(&self) -> Vec<IndicatorValue> {
        self.iter()
            .map(|(key, value)| IndicatorValue {
                key: key.clone(),
                value,
            })
            .collect()
    }
}
