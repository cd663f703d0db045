//! Hypervolume indicator.
//!
//! The hypervolume is the Lebesgue measure of the region dominated by an
//! approximation set and bounded above by a reference point (minimization).
//! Points that are not strictly better than the reference point in every
//! objective contribute nothing.
//!
//! The exact computation uses a dimension sweep for two objectives and
//! recursive slicing on the last objective beyond that. The cost grows
//! exponentially with the number of objectives, which is acceptable for the
//! small objective counts found in benchmark suites.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dominance::{self, TiePolicy};

/// Exact hypervolume of `points` with respect to `reference`.
///
/// # Example
/// ```
/// use moebench_core::hypervolume::hypervolume;
///
/// let front = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
/// let hv = hypervolume(&front, &[1.1, 1.1]);
/// assert!((hv - 0.21).abs() < 1e-12);
/// ```
#[must_use]
pub fn hypervolume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let inside = strictly_inside(points, reference);
    if inside.is_empty() {
        return 0.0;
    }
    match reference.len() {
        0 => 0.0,
        1 => {
            let best = inside.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            reference[0] - best
        }
        2 => sweep_2d(inside, reference),
        _ => slice(&inside, reference),
    }
}

/// Monte Carlo estimate of the hypervolume using `samples` uniform draws in
/// the box spanned by the ideal point of `points` and `reference`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hypervolume_monte_carlo(
    points: &[Vec<f64>],
    reference: &[f64],
    samples: usize,
    seed: u64,
) -> f64 {
    let inside = strictly_inside(points, reference);
    if inside.is_empty() || samples == 0 {
        return 0.0;
    }
    let d = reference.len();
    let mut lower = vec![f64::INFINITY; d];
    for p in &inside {
        for (lo, &v) in lower.iter_mut().zip(p) {
            *lo = lo.min(v);
        }
    }
    let box_volume: f64 = lower.iter().zip(reference).map(|(lo, hi)| hi - lo).product();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = vec![0.0; d];
    let mut hits = 0usize;
    for _ in 0..samples {
        for ((s, lo), hi) in sample.iter_mut().zip(&lower).zip(reference) {
            *s = lo + rng.gen::<f64>() * (hi - lo);
        }
        if inside
            .iter()
            .any(|p| p.iter().zip(&sample).all(|(pv, sv)| pv <= sv))
        {
            hits += 1;
        }
    }
    box_volume * hits as f64 / samples as f64
}

fn strictly_inside(points: &[Vec<f64>], reference: &[f64]) -> Vec<Vec<f64>> {
    points
        .iter()
        .filter(|p| p.len() == reference.len() && p.iter().zip(reference).all(|(v, r)| v < r))
        .cloned()
        .collect()
}

/// Two-objective sweep: sort by the first objective and accumulate the
/// strip each point adds below the best second objective seen so far.
fn sweep_2d(mut points: Vec<Vec<f64>>, reference: &[f64]) -> f64 {
    points.sort_by(|a, b| dominance::lexicographic_cmp(a, b));
    let mut area = 0.0;
    let mut ceiling = reference[1];
    for p in &points {
        if p[1] < ceiling {
            area += (reference[0] - p[0]) * (ceiling - p[1]);
            ceiling = p[1];
        }
    }
    area
}

/// Slice along the last objective: between consecutive values of that
/// objective the dominated region is a prism whose base is the hypervolume
/// of the points seen so far, projected on the remaining objectives.
fn slice(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let d = reference.len();
    if d == 2 {
        return sweep_2d(points.to_vec(), reference);
    }

    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[d - 1].total_cmp(&b[d - 1]));

    let sub_reference = &reference[..d - 1];
    let mut projected: Vec<Vec<f64>> = Vec::with_capacity(sorted.len());
    let mut volume = 0.0;

    for (i, p) in sorted.iter().enumerate() {
        projected.push(p[..d - 1].to_vec());
        let upper = sorted.get(i + 1).map_or(reference[d - 1], |next| next[d - 1]);
        let height = upper - p[d - 1];
        if height <= 0.0 {
            continue;
        }
        projected = dominance::non_dominated(&projected, TiePolicy::Deduplicate);
        volume += height * slice(&projected, sub_reference);
    }
    volume
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_front_counts_overlap_once() {
        let front = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let hv = hypervolume(&front, &[1.1, 1.1]);
        // strips 1.0 x 0.1 and 0.1 x 1.1
        assert!((hv - 0.21).abs() < 1e-12);
    }

    #[test]
    fn staircase_2d() {
        let front = vec![vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]];
        assert!((hypervolume(&front, &[4.0, 4.0]) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_box() {
        assert!((hypervolume(&[vec![1.0, 1.0]], &[3.0, 3.0]) - 4.0).abs() < 1e-12);
        assert!((hypervolume(&[vec![1.0, 1.0, 1.0]], &[2.0, 2.0, 2.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn points_outside_reference_are_ignored() {
        assert_eq!(hypervolume(&[vec![5.0, 5.0]], &[5.0, 5.0]), 0.0);
        assert_eq!(hypervolume(&[vec![0.0, 6.0]], &[5.0, 5.0]), 0.0);
        assert_eq!(hypervolume(&[], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn one_objective() {
        assert!((hypervolume(&[vec![0.25], vec![0.5]], &[1.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn dominated_point_does_not_change_value() {
        let front = vec![vec![0.2, 0.8], vec![0.6, 0.3]];
        let base = hypervolume(&front, &[1.0, 1.0]);
        let mut extended = front.clone();
        extended.push(vec![0.7, 0.9]);
        assert!((hypervolume(&extended, &[1.0, 1.0]) - base).abs() < 1e-12);
    }

    #[test]
    fn three_objective_union_of_boxes() {
        // 0.5 + 0.5 - overlap [0.5,1] x [0.5,1] x [0,1]
        let points = vec![vec![0.5, 0.0, 0.0], vec![0.0, 0.5, 0.0]];
        let hv = hypervolume(&points, &[1.0, 1.0, 1.0]);
        assert!((hv - 0.75).abs() < 1e-12);
    }

    #[test]
    fn three_objective_staircase() {
        let points = vec![
            vec![0.0, 0.5, 0.5],
            vec![0.5, 0.0, 0.5],
            vec![0.5, 0.5, 0.0],
        ];
        // inclusion-exclusion: 3 * 0.25 - 3 * 0.125 + 0.125
        let hv = hypervolume(&points, &[1.0, 1.0, 1.0]);
        assert!((hv - 0.5).abs() < 1e-12);
    }

    #[test]
    fn four_objectives_single_point() {
        let hv = hypervolume(&[vec![0.5, 0.5, 0.5, 0.5]], &[1.0, 1.0, 1.0, 1.0]);
        assert!((hv - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn monte_carlo_close_to_exact() {
        let front = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
        let exact = hypervolume(&front, &[1.1, 1.1]);
        let estimate = hypervolume_monte_carlo(&front, &[1.1, 1.1], 200_000, 42);
        assert!((exact - estimate).abs() < 0.01, "{exact} vs {estimate}");
    }

    #[test]
    fn monte_carlo_is_reproducible() {
        let front = vec![vec![0.1, 0.7], vec![0.4, 0.2]];
        let a = hypervolume_monte_carlo(&front, &[1.0, 1.0], 1_000, 9);
        let b = hypervolume_monte_carlo(&front, &[1.0, 1.0], 1_000, 9);
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(hypervolume_monte_carlo(&front, &[1.0, 1.0], 0, 9), 0.0);
    }
}
