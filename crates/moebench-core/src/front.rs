//! Reference fronts and min-max normalization.

use serde::{Deserialize, Serialize};

use crate::dominance::{self, TiePolicy};
use crate::error::EvalError;

/// A read-only set of objective vectors used as ground truth for a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFront {
    points: Vec<Vec<f64>>,
    objectives: usize,
}

impl ReferenceFront {
    /// Wrap `points` verbatim, checking that every vector has `objectives`
    /// finite components.
    pub fn new(points: Vec<Vec<f64>>, objectives: usize) -> Result<Self, EvalError> {
        if let Some(bad) = points.iter().find(|p| p.len() != objectives) {
            return Err(EvalError::DimensionMismatch {
                expected: objectives,
                found: bad.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(EvalError::NonFiniteObjective { index });
        }
        Ok(Self { points, objectives })
    }

    /// Build a front from a pooled set of vectors by keeping its
    /// non-dominated subset.
    ///
    /// A pool with fewer than two distinct vectors is kept verbatim.
    pub fn from_pool(
        pool: Vec<Vec<f64>>,
        objectives: usize,
        ties: TiePolicy,
    ) -> Result<Self, EvalError> {
        Self::new(pool, objectives).map(|front| front.into_non_dominated(ties))
    }

    /// Drop the dominated vectors of the front.
    ///
    /// A front with fewer than two distinct vectors is returned unchanged.
    #[must_use]
    pub fn into_non_dominated(self, ties: TiePolicy) -> Self {
        if dominance::distinct_count(&self.points) < 2 {
            return self;
        }
        Self {
            points: dominance::non_dominated(&self.points, ties),
            objectives: self.objectives,
        }
    }

    /// The vectors of the front.
    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Number of vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the front is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of objectives.
    #[must_use]
    pub fn number_of_objectives(&self) -> usize {
        self.objectives
    }

    /// A front with fewer than two distinct vectors cannot support
    /// distance-based scoring.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        dominance::distinct_count(&self.points) < 2
    }

    /// Best value per objective, `None` for an empty front.
    #[must_use]
    pub fn ideal(&self) -> Option<Vec<f64>> {
        self.fold(f64::INFINITY, f64::min)
    }

    /// Worst value per objective, `None` for an empty front.
    #[must_use]
    pub fn nadir(&self) -> Option<Vec<f64>> {
        self.fold(f64::NEG_INFINITY, f64::max)
    }

    fn fold(&self, init: f64, f: fn(f64, f64) -> f64) -> Option<Vec<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let mut acc = vec![init; self.objectives];
        for p in &self.points {
            for (a, &v) in acc.iter_mut().zip(p) {
                *a = f(*a, v);
            }
        }
        Some(acc)
    }
}

/// Min-max normalizer built from the bounds of a reference front.
///
/// Objectives whose range is zero are shifted but not scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontNormalizer {
    min: Vec<f64>,
    range: Vec<f64>,
}

impl FrontNormalizer {
    /// Build a normalizer from `front`; `None` for an empty front.
    #[must_use]
    pub fn new(front: &ReferenceFront) -> Option<Self> {
        let min = front.ideal()?;
        let max = front.nadir()?;
        let range = min
            .iter()
            .zip(&max)
            .map(|(lo, hi)| {
                let r = hi - lo;
                if r > 0.0 {
                    r
                } else {
                    1.0
                }
            })
            .collect();
        Some(Self { min, range })
    }

    /// Normalize one vector.
    #[must_use]
    pub fn normalize_point(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(self.min.iter().zip(&self.range))
            .map(|(v, (lo, r))| (v - lo) / r)
            .collect()
    }

    /// Normalize a set of vectors.
    #[must_use]
    pub fn normalize(&self, points: &[Vec<f64>]) -> Vec<Vec<f64>> {
        points.iter().map(|p| self.normalize_point(p)).collect()
    }
}
