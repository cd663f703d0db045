//! Indicator and statistics settings.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HV_MONTE_CARLO_SAMPLES, DEFAULT_HV_NADIR_FRACTION, DEFAULT_SIGNIFICANCE_LEVEL,
    EXACT_RANK_SUM_LIMIT,
};
use crate::front::ReferenceFront;

/// How the hypervolume reference point is chosen.
///
/// Coordinates are in raw objective units; when normalization is enabled the
/// resolved point is normalized together with the fronts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferencePoint {
    /// A fixed point.
    Explicit(Vec<f64>),
    /// Worst reference-front value plus an absolute margin.
    NadirMargin(f64),
    /// Worst reference-front value plus a fraction of the front's range.
    NadirFraction(f64),
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self::NadirFraction(DEFAULT_HV_NADIR_FRACTION)
    }
}

impl ReferencePoint {
    /// Resolve against `front`; `None` if the front is empty or an explicit
    /// point has the wrong dimension.
    #[must_use]
    pub fn resolve(&self, front: &ReferenceFront) -> Option<Vec<f64>> {
        match self {
            Self::Explicit(point) => {
                (point.len() == front.number_of_objectives()).then(|| point.clone())
            }
            Self::NadirMargin(margin) => {
                let nadir = front.nadir()?;
                Some(nadir.iter().map(|v| v + margin).collect())
            }
            Self::NadirFraction(fraction) => {
                let ideal = front.ideal()?;
                let nadir = front.nadir()?;
                Some(
                    nadir
                        .iter()
                        .zip(&ideal)
                        .map(|(hi, lo)| hi + fraction * (hi - lo))
                        .collect(),
                )
            }
        }
    }
}

/// Exact or sampled hypervolume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HypervolumeMethod {
    /// Sweep for two objectives, recursive slicing beyond.
    #[default]
    Exact,
    /// Uniform sampling of the box spanned by the ideal and reference points.
    MonteCarlo {
        /// Number of samples.
        samples: usize,
        /// Seed of the sampler.
        seed: u64,
    },
}

/// Hypervolume configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypervolumeSettings {
    /// Reference point policy.
    pub reference_point: ReferencePoint,
    /// Computation method.
    pub method: HypervolumeMethod,
}

/// Options for the quality indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    /// Normalize fronts with the reference front bounds before scoring.
    pub normalize: bool,
    /// Hypervolume configuration.
    pub hypervolume: HypervolumeSettings,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            normalize: true,
            hypervolume: HypervolumeSettings::default(),
        }
    }
}

/// Options for the statistical comparator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSettings {
    /// Significance level of the hypothesis tests.
    pub significance_level: f64,
    /// Largest group size for the exact rank-sum distribution.
    pub exact_limit: usize,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            exact_limit: EXACT_RANK_SUM_LIMIT,
        }
    }
}

impl StatisticsSettings {
    /// Normalize settings, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.significance_level <= 0.0 {
            self.significance_level = DEFAULT_SIGNIFICANCE_LEVEL;
        }
        if self.exact_limit == 0 {
            self.exact_limit = EXACT_RANK_SUM_LIMIT;
        }
        self
    }
}

impl HypervolumeMethod {
    /// Monte Carlo estimation with the default sample count.
    #[must_use]
    pub fn monte_carlo(seed: u64) -> Self {
        Self::MonteCarlo {
            samples: DEFAULT_HV_MONTE_CARLO_SAMPLES,
            seed,
        }
    }
}
