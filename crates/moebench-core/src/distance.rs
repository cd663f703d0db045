//! Distance-based indicators: GD, IGD and IGD+.
//!
//! Inputs are assumed non-empty and dimension-consistent; the indicator
//! dispatcher in [`crate::indicator`] enforces that before calling in.

/// Euclidean distance between two vectors.
#[must_use]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Dominance-aware distance from reference point `reference` to
/// approximation point `point`: only components where `point` is worse
/// contribute.
#[must_use]
pub fn dominance_distance(reference: &[f64], point: &[f64]) -> f64 {
    reference
        .iter()
        .zip(point)
        .map(|(r, a)| {
            let d = (a - r).max(0.0);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Distance from `point` to the closest member of `set` under `metric`.
pub fn distance_to_nearest(
    point: &[f64],
    set: &[Vec<f64>],
    metric: impl Fn(&[f64], &[f64]) -> f64,
) -> f64 {
    set.iter()
        .map(|other| metric(point, other))
        .fold(f64::INFINITY, f64::min)
}

#[allow(clippy::cast_precision_loss)]
fn mean_nearest(
    from: &[Vec<f64>],
    to: &[Vec<f64>],
    metric: impl Fn(&[f64], &[f64]) -> f64 + Copy,
) -> f64 {
    let total: f64 = from
        .iter()
        .map(|p| distance_to_nearest(p, to, metric))
        .sum();
    total / from.len() as f64
}

/// Generational distance: mean distance from each approximation point to
/// its nearest reference point.
#[must_use]
pub fn generational_distance(approximation: &[Vec<f64>], front: &[Vec<f64>]) -> f64 {
    mean_nearest(approximation, front, euclidean_distance)
}

/// Inverted generational distance: mean distance from each reference point
/// to its nearest approximation point.
#[must_use]
pub fn inverted_generational_distance(approximation: &[Vec<f64>], front: &[Vec<f64>]) -> f64 {
    mean_nearest(front, approximation, euclidean_distance)
}

/// IGD+: IGD with the dominance-aware distance.
#[must_use]
pub fn inverted_generational_distance_plus(
    approximation: &[Vec<f64>],
    front: &[Vec<f64>],
) -> f64 {
    mean_nearest(front, approximation, dominance_distance)
}
