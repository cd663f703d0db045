//! Additive epsilon indicator.

/// Smallest `eps` such that every reference point is weakly dominated by
/// some approximation point shifted by `-eps`.
///
/// Computed as `max_r min_a max_i (a_i - r_i)`.
#[must_use]
pub fn additive_epsilon(approximation: &[Vec<f64>], front: &[Vec<f64>]) -> f64 {
    front
        .iter()
        .map(|r| {
            approximation
                .iter()
                .map(|a| {
                    a.iter()
                        .zip(r)
                        .map(|(av, rv)| av - rv)
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}
