//! Friedman rank test over complete blocks.

use serde::{Deserialize, Serialize};

use crate::ranking::{average_ranks, tie_correction_term};
use crate::special::chi_square_sf;

/// Result of a Friedman test over `k` treatments and `blocks` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriedmanTest {
    /// Tie-corrected chi-square statistic.
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    pub blocks: usize,
    /// Rank sum per treatment.
    pub rank_sums: Vec<f64>,
    /// Mean rank per treatment; 1 is best.
    pub average_ranks: Vec<f64>,
    /// Treatment indices from best to worst average rank.
    pub ordering: Vec<usize>,
}

impl FriedmanTest {
    /// Whether equal treatment effects are rejected at level `alpha`.
    #[must_use]
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Run the test on `blocks`, each holding one score per treatment where lower
/// is better.
///
/// Returns `None` with fewer than three treatments, fewer than two blocks or
/// blocks of unequal length.
#[must_use]
pub fn friedman_test(blocks: &[Vec<f64>]) -> Option<FriedmanTest> {
    let n = blocks.len();
    let k = blocks.first()?.len();
    if k < 3 || n < 2 || blocks.iter().any(|b| b.len() != k) {
        return None;
    }

    let mut rank_sums = vec![0.0; k];
    let mut ties = 0.0;
    for block in blocks {
        for (sum, rank) in rank_sums.iter_mut().zip(average_ranks(block)) {
            *sum += rank;
        }
        ties += tie_correction_term(block);
    }

    #[allow(clippy::cast_precision_loss)]
    let (nf, kf) = (n as f64, k as f64);
    let squares: f64 = rank_sums.iter().map(|r| r * r).sum();
    let raw = 12.0 / (nf * kf * (kf + 1.0)) * squares - 3.0 * nf * (kf + 1.0);
    let correction = 1.0 - ties / (nf * kf * (kf * kf - 1.0));
    let statistic = if correction <= f64::EPSILON {
        0.0
    } else {
        (raw / correction).max(0.0)
    };
    let degrees_of_freedom = k - 1;
    #[allow(clippy::cast_precision_loss)]
    let p_value = if statistic == 0.0 {
        1.0
    } else {
        chi_square_sf(statistic, degrees_of_freedom as f64)
    };

    let average_ranks: Vec<f64> = rank_sums.iter().map(|r| r / nf).collect();
    let mut ordering: Vec<usize> = (0..k).collect();
    ordering.sort_by(|&a, &b| average_ranks[a].total_cmp(&average_ranks[b]).then(a.cmp(&b)));

    Some(FriedmanTest {
        statistic,
        p_value,
        degrees_of_freedom,
        blocks: n,
        rank_sums,
        average_ranks,
        ordering,
    })
}
