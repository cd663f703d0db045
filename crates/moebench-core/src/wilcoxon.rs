//! Wilcoxon rank-sum (Mann–Whitney) test.

use serde::{Deserialize, Serialize};

use crate::ranking::{average_ranks, tie_correction_term};
use crate::special::normal_sf;

/// How the p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PValueMethod {
    /// Exact null distribution of the rank sum.
    Exact,
    /// Normal approximation with tie and continuity correction.
    NormalApproximation,
}

/// Result of a two-sided rank-sum test between samples `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankSumTest {
    pub n1: usize,
    pub n2: usize,
    /// Sum of the ranks of `a` in the pooled sample.
    pub rank_sum: f64,
    /// Mann–Whitney `U` of `a`.
    pub u: f64,
    /// Standardized statistic, present for the normal approximation.
    pub z: Option<f64>,
    pub p_value: f64,
    pub method: PValueMethod,
}

impl RankSumTest {
    /// Whether equal medians are rejected at level `alpha`.
    #[must_use]
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Run the test; `None` when either sample is empty.
///
/// The exact distribution is used when both samples have at most
/// `exact_limit` values and the pooled sample has no ties.
#[must_use]
pub fn rank_sum_test(a: &[f64], b: &[f64], exact_limit: usize) -> Option<RankSumTest> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let (n1, n2) = (a.len(), b.len());
    let pooled: Vec<f64> = a.iter().chain(b).copied().collect();
    let ranks = average_ranks(&pooled);
    let rank_sum: f64 = ranks[..n1].iter().sum();

    #[allow(clippy::cast_precision_loss)]
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u = rank_sum - n1f * (n1f + 1.0) / 2.0;
    let ties = tie_correction_term(&pooled);

    if n1 <= exact_limit && n2 <= exact_limit && ties == 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let w = rank_sum.round() as usize;
        return Some(RankSumTest {
            n1,
            n2,
            rank_sum,
            u,
            z: None,
            p_value: exact_p_value(n1, n2, w),
            method: PValueMethod::Exact,
        });
    }

    let n = n1f + n2f;
    let mu = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));
    let (z, p_value) = if variance <= f64::EPSILON {
        (0.0, 1.0)
    } else {
        let diff = u - mu;
        let corrected = (diff.abs() - 0.5).max(0.0);
        let z = corrected.copysign(diff) / variance.sqrt();
        if z == 0.0 {
            (0.0, 1.0)
        } else {
            (z, (2.0 * normal_sf(z.abs())).min(1.0))
        }
    };
    Some(RankSumTest {
        n1,
        n2,
        rank_sum,
        u,
        z: Some(z),
        p_value,
        method: PValueMethod::NormalApproximation,
    })
}

// Two-sided p-value of rank sum `w` for a sample of `n1` ranks drawn from
// 1..=n1+n2, by counting subsets per (size, sum).
fn exact_p_value(n1: usize, n2: usize, w: usize) -> f64 {
    let n = n1 + n2;
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![vec![0.0f64; max_sum + 1]; n1 + 1];
    counts[0][0] = 1.0;
    for rank in 1..=n {
        for k in (1..=n1.min(rank)).rev() {
            let (lower, upper) = counts.split_at_mut(k);
            let prev = &lower[k - 1];
            let cur = &mut upper[0];
            for s in (rank..=max_sum).rev() {
                cur[s] += prev[s - rank];
            }
        }
    }
    let dist = &counts[n1];
    let total: f64 = dist.iter().sum();
    let lower: f64 = dist[..=w.min(max_sum)].iter().sum();
    let upper: f64 = dist[w.min(max_sum)..].iter().sum();
    (2.0 * lower.min(upper) / total).min(1.0)
}
