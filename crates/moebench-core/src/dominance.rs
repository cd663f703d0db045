//! Pareto dominance and non-dominated filtering (all objectives minimized).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Outcome of comparing two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// The first vector dominates the second.
    Dominates,
    /// The first vector is dominated by the second.
    DominatedBy,
    /// Neither dominates; the vectors differ.
    Incomparable,
    /// The vectors are identical.
    Equal,
}

/// How identical objective vectors are handled by non-dominated filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// Identical vectors are mutually non-dominating; all copies are kept.
    #[default]
    KeepAll,
    /// Identical vectors collapse to their first occurrence.
    Deduplicate,
}

/// Compare `a` and `b` under Pareto dominance.
#[must_use]
pub fn compare(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len());
    let mut a_better = false;
    let mut b_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            a_better = true;
        } else if y < x {
            b_better = true;
        }
        if a_better && b_better {
            return Dominance::Incomparable;
        }
    }
    match (a_better, b_better) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::DominatedBy,
        (false, false) => Dominance::Equal,
        (true, true) => Dominance::Incomparable,
    }
}

/// Returns `true` if `a` is no worse than `b` everywhere and strictly
/// better somewhere.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    compare(a, b) == Dominance::Dominates
}

/// Lexicographic order on objective vectors: first objective, then the next
/// ones to break ties.
///
/// `-0.0` and `0.0` compare equal, matching [`compare`].
#[must_use]
pub fn lexicographic_cmp(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match crate::ranking::value_cmp(*x, *y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Indices of the non-dominated vectors of `points`, in lexicographic order
/// of the vectors they point to.
///
/// The sort is stable, so identical vectors keep their input order and the
/// result is deterministic for a given input.
#[must_use]
pub fn non_dominated_indices(points: &[Vec<f64>], ties: TiePolicy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| lexicographic_cmp(&points[i], &points[j]));

    let mut kept: Vec<usize> = Vec::with_capacity(order.len());
    for (pos, &i) in order.iter().enumerate() {
        let candidate = &points[i];
        // Under lexicographic order only earlier vectors can dominate.
        let dominated = order[..pos]
            .iter()
            .any(|&j| dominates(&points[j], candidate));
        if dominated {
            continue;
        }
        if ties == TiePolicy::Deduplicate {
            if let Some(&last) = kept.last() {
                if points[last] == *candidate {
                    continue;
                }
            }
        }
        kept.push(i);
    }
    kept
}

/// The non-dominated subset of `points` in lexicographic order.
#[must_use]
pub fn non_dominated(points: &[Vec<f64>], ties: TiePolicy) -> Vec<Vec<f64>> {
    non_dominated_indices(points, ties)
        .into_iter()
        .map(|i| points[i].clone())
        .collect()
}

/// Number of pairwise distinct vectors in `points`.
#[must_use]
pub fn distinct_count(points: &[Vec<f64>]) -> usize {
    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| lexicographic_cmp(a, b));
    sorted.dedup();
    sorted.len()
}

/// Crowding distance of each vector in `front`, in input order.
///
/// Boundary vectors of any objective get `f64::INFINITY`.
#[must_use]
#[allow(clippy::needless_range_loop)]
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = front[0].len();
    let mut distances = vec![0.0_f64; n];

    for obj in 0..m {
        let mut sorted: Vec<usize> = (0..n).collect();
        sorted.sort_by(|&a, &b| front[a][obj].total_cmp(&front[b][obj]));

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[n - 1]] = f64::INFINITY;

        let range = front[sorted[n - 1]][obj] - front[sorted[0]][obj];
        if range > 0.0 {
            for i in 1..(n - 1) {
                distances[sorted[i]] +=
                    (front[sorted[i + 1]][obj] - front[sorted[i - 1]][obj]) / range;
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_basic() {
        assert_eq!(compare(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Dominates);
        assert_eq!(compare(&[2.0, 2.0], &[1.0, 1.0]), Dominance::DominatedBy);
        assert_eq!(compare(&[1.0, 3.0], &[3.0, 1.0]), Dominance::Incomparable);
        assert_eq!(compare(&[1.0, 1.0], &[1.0, 1.0]), Dominance::Equal);
        assert_eq!(compare(&[1.0, 2.0], &[1.0, 3.0]), Dominance::Dominates);
    }

    #[test]
    fn equal_vectors_do_not_dominate() {
        assert!(!dominates(&[1.0, 1.0], &[1.0, 1.0]));
    }

    #[test]
    fn filter_known_set() {
        let points = vec![
            vec![4.0, 4.0],
            vec![5.0, 1.0],
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![6.0, 6.0],
        ];
        let front = non_dominated(&points, TiePolicy::KeepAll);
        assert_eq!(front, vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]);
        assert_eq!(non_dominated_indices(&points, TiePolicy::KeepAll), vec![2, 3, 1]);
    }

    #[test]
    fn ties_are_kept_or_collapsed() {
        let points = vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![1.0, 2.0]];
        assert_eq!(non_dominated(&points, TiePolicy::KeepAll).len(), 3);
        assert_eq!(
            non_dominated(&points, TiePolicy::Deduplicate),
            vec![vec![1.0, 2.0], vec![2.0, 1.0]]
        );
        assert_eq!(
            non_dominated_indices(&points, TiePolicy::KeepAll),
            vec![0, 2, 1]
        );
    }

    #[test]
    fn filter_is_idempotent() {
        let points = vec![
            vec![0.2, 0.9],
            vec![0.5, 0.5],
            vec![0.6, 0.6],
            vec![0.9, 0.1],
        ];
        let once = non_dominated(&points, TiePolicy::KeepAll);
        let twice = non_dominated(&once, TiePolicy::KeepAll);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_empty_and_single() {
        assert!(non_dominated(&[], TiePolicy::KeepAll).is_empty());
        assert_eq!(
            non_dominated(&[vec![1.0, 2.0]], TiePolicy::KeepAll),
            vec![vec![1.0, 2.0]]
        );
    }

    #[test]
    fn lexicographic_breaks_ties_on_later_objectives() {
        assert_eq!(lexicographic_cmp(&[1.0, 2.0], &[1.0, 3.0]), Ordering::Less);
        assert_eq!(lexicographic_cmp(&[2.0, 0.0], &[1.0, 3.0]), Ordering::Greater);
        assert_eq!(lexicographic_cmp(&[1.0, 3.0], &[1.0, 3.0]), Ordering::Equal);
    }

    #[test]
    fn signed_zero_does_not_hide_a_dominated_vector() {
        let points = vec![vec![-0.0, 2.0], vec![0.0, 1.0]];
        let front = non_dominated(&points, TiePolicy::KeepAll);
        assert_eq!(front, vec![vec![0.0, 1.0]]);
        assert_eq!(lexicographic_cmp(&[-0.0, 1.0], &[0.0, 1.0]), Ordering::Equal);
        assert_eq!(distinct_count(&[vec![-0.0, 1.0], vec![0.0, 1.0]]), 1);
    }

    #[test]
    fn distinct_count_ignores_duplicates() {
        let points = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![2.0, 1.0]];
        assert_eq!(distinct_count(&points), 2);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn crowding_distance_boundaries_are_infinite() {
        let front = vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]];
        let cd = crowding_distance(&front);
        assert!(cd[0].is_infinite());
        assert!(cd[2].is_infinite());
        assert!((cd[1] - 2.0).abs() < 1e-12);
    }
}
