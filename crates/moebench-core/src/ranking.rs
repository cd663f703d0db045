//! Average ranks with tie handling.

use std::cmp::Ordering;

/// Total order on scores in which `-0.0` and `0.0` are the same value.
#[must_use]
pub fn value_cmp(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Rank `values` in ascending order starting at 1, assigning tied values the
/// mean of the ranks they span.
///
/// Ordering uses [`value_cmp`], so the result is deterministic for any
/// input.
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| value_cmp(values[a], values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && value_cmp(values[order[end]], values[order[start]]).is_eq() {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        #[allow(clippy::cast_precision_loss)]
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Sizes of the groups of tied values (groups of one included).
#[must_use]
pub fn tie_groups(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| value_cmp(*a, *b));
    let mut groups = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && value_cmp(sorted[end], sorted[start]).is_eq() {
            end += 1;
        }
        groups.push(end - start);
        start = end;
    }
    groups
}

/// `Σ (t³ − t)` over tie groups, the usual tie-correction term.
#[must_use]
pub fn tie_correction_term(values: &[f64]) -> f64 {
    tie_groups(values)
        .into_iter()
        .map(|t| {
            #[allow(clippy::cast_precision_loss)]
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}
