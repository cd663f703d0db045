//! Spread (Deb's delta) indicator.

use crate::distance::euclidean_distance;
use crate::dominance::lexicographic_cmp;

/// Spread of `approximation` relative to the extremes of `front`.
///
/// Both sets are sorted lexicographically. `d_f` and `d_l` are the distances
/// between the first and last points of both sets, `d_i` the distances
/// between consecutive approximation points and `d̄` their mean:
/// `(d_f + d_l + Σ|d_i − d̄|) / (d_f + d_l + (N − 1) d̄)`.
///
/// A single-point approximation scores 1.0. Returns `None` when the
/// denominator is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn spread(approximation: &[Vec<f64>], front: &[Vec<f64>]) -> Option<f64> {
    let mut approx: Vec<&Vec<f64>> = approximation.iter().collect();
    approx.sort_by(|a, b| lexicographic_cmp(a, b));
    let mut reference: Vec<&Vec<f64>> = front.iter().collect();
    reference.sort_by(|a, b| lexicographic_cmp(a, b));

    let n = approx.len();
    if n == 0 || reference.is_empty() {
        return None;
    }
    if n == 1 {
        return Some(1.0);
    }

    let d_first = euclidean_distance(approx[0], reference[0]);
    let d_last = euclidean_distance(approx[n - 1], reference[reference.len() - 1]);

    let gaps: Vec<f64> = approx
        .windows(2)
        .map(|w| euclidean_distance(w[0], w[1]))
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let diversity: f64 = gaps.iter().map(|d| (d - mean).abs()).sum();

    let denominator = d_first + d_last + (n - 1) as f64 * mean;
    if denominator <= 0.0 {
        return None;
    }
    Some((d_first + d_last + diversity) / denominator)
}
