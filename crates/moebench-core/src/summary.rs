//! Descriptive statistics over indicator samples.

use serde::{Deserialize, Serialize};

/// Mean, median, spread and count of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n − 1 denominator), 0 for a single value.
    pub std_dev: f64,
    /// Interquartile range, `Q3 − Q1` with linear interpolation.
    pub iqr: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `values`; `None` when empty.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mean = mean(values)?;
        Some(Self {
            count: values.len(),
            mean,
            median: quantile_sorted(&sorted, 0.5),
            std_dev: std_dev(values, mean),
            iqr: quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Arithmetic mean; `None` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}

/// Median; `None` when empty.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, 0.5))
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = (values.len() - 1) as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / denom;
    var.sqrt()
}

// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let pos = q * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    #[allow(clippy::cast_precision_loss)]
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
