//! Quality indicator catalog and dispatch.
//!
//! The catalog is closed: names are resolved to [`IndicatorKind`] once, at
//! configuration time. [`evaluate`] guards every indicator against empty
//! approximations, degenerate fronts and dimension mismatches, returning an
//! explicit [`Measurement::Undefined`] instead of a number.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance;
use crate::epsilon::additive_epsilon;
use crate::error::EvalError;
use crate::front::{FrontNormalizer, ReferenceFront};
use crate::hypervolume;
use crate::options::{HypervolumeMethod, IndicatorSettings};
use crate::spread::spread;

/// The supported quality indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorKind {
    /// Additive epsilon.
    #[serde(rename = "EP")]
    Epsilon,
    /// Spread (Deb's delta).
    #[serde(rename = "SPREAD")]
    Spread,
    /// Generational distance.
    #[serde(rename = "GD")]
    GenerationalDistance,
    /// Inverted generational distance.
    #[serde(rename = "IGD")]
    InvertedGenerationalDistance,
    /// Inverted generational distance plus.
    #[serde(rename = "IGD+")]
    InvertedGenerationalDistancePlus,
    /// Hypervolume.
    #[serde(rename = "HV")]
    Hypervolume,
}

impl IndicatorKind {
    /// Every indicator, in catalog order.
    pub const ALL: [IndicatorKind; 6] = [
        Self::Epsilon,
        Self::Spread,
        Self::GenerationalDistance,
        Self::InvertedGenerationalDistance,
        Self::InvertedGenerationalDistancePlus,
        Self::Hypervolume,
    ];

    /// Short name used in tables and file names.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Epsilon => "EP",
            Self::Spread => "SPREAD",
            Self::GenerationalDistance => "GD",
            Self::InvertedGenerationalDistance => "IGD",
            Self::InvertedGenerationalDistancePlus => "IGD+",
            Self::Hypervolume => "HV",
        }
    }

    /// Whether lower values are better.
    #[must_use]
    pub fn is_minimization(self) -> bool {
        !matches!(self, Self::Hypervolume)
    }

    /// Order two scores so that the better one comes first.
    #[must_use]
    pub fn cmp_better(self, a: f64, b: f64) -> Ordering {
        if self.is_minimization() {
            crate::ranking::value_cmp(a, b)
        } else {
            crate::ranking::value_cmp(b, a)
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EP" | "EPSILON" => Ok(Self::Epsilon),
            "SPREAD" => Ok(Self::Spread),
            "GD" => Ok(Self::GenerationalDistance),
            "IGD" => Ok(Self::InvertedGenerationalDistance),
            "IGD+" | "IGDPLUS" => Ok(Self::InvertedGenerationalDistancePlus),
            "HV" | "HYPERVOLUME" => Ok(Self::Hypervolume),
            other => Err(EvalError::Config(format!("unknown indicator: {other}"))),
        }
    }
}

/// Resolve indicator names, dropping duplicates and keeping first-seen order.
pub fn parse_indicators<S: AsRef<str>>(names: &[S]) -> Result<Vec<IndicatorKind>, EvalError> {
    let mut kinds = Vec::with_capacity(names.len());
    for name in names {
        let kind: IndicatorKind = name.as_ref().parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Why an indicator value could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UndefinedReason {
    /// The approximation set is empty.
    EmptyApproximation,
    /// The reference front has fewer than two distinct vectors.
    DegenerateFront,
    /// Vector lengths do not match the front or the reference point.
    DimensionMismatch,
    /// The computation produced a non-finite number.
    NonFinite,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyApproximation => "empty approximation",
            Self::DegenerateFront => "degenerate reference front",
            Self::DimensionMismatch => "dimension mismatch",
            Self::NonFinite => "non-finite value",
        };
        f.write_str(text)
    }
}

/// An indicator cell: a score or an explicit "undefined" marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Measurement {
    /// A computed score.
    Defined(f64),
    /// No score could be computed.
    Undefined(UndefinedReason),
}

impl Measurement {
    /// The score, if defined.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined(_) => None,
        }
    }

    /// Whether a score is present.
    #[must_use]
    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }

    fn checked(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined(UndefinedReason::NonFinite)
        }
    }
}

/// Score `approximation` against `front` with indicator `kind`.
#[must_use]
pub fn evaluate(
    kind: IndicatorKind,
    front: &ReferenceFront,
    approximation: &[Vec<f64>],
    settings: &IndicatorSettings,
) -> Measurement {
    if approximation.is_empty() {
        return Measurement::Undefined(UndefinedReason::EmptyApproximation);
    }
    if front.is_degenerate() {
        return Measurement::Undefined(UndefinedReason::DegenerateFront);
    }
    let m = front.number_of_objectives();
    if approximation.iter().any(|p| p.len() != m) {
        return Measurement::Undefined(UndefinedReason::DimensionMismatch);
    }

    let normalizer = if settings.normalize {
        FrontNormalizer::new(front)
    } else {
        None
    };
    let (reference, approx) = match &normalizer {
        Some(n) => (n.normalize(front.points()), n.normalize(approximation)),
        None => (front.points().to_vec(), approximation.to_vec()),
    };

    match kind {
        IndicatorKind::Epsilon => Measurement::checked(additive_epsilon(&approx, &reference)),
        IndicatorKind::Spread => spread(&approx, &reference).map_or(
            Measurement::Undefined(UndefinedReason::NonFinite),
            Measurement::checked,
        ),
        IndicatorKind::GenerationalDistance => {
            Measurement::checked(distance::generational_distance(&approx, &reference))
        }
        IndicatorKind::InvertedGenerationalDistance => {
            Measurement::checked(distance::inverted_generational_distance(&approx, &reference))
        }
        IndicatorKind::InvertedGenerationalDistancePlus => Measurement::checked(
            distance::inverted_generational_distance_plus(&approx, &reference),
        ),
        IndicatorKind::Hypervolume => {
            let Some(raw) = settings.hypervolume.reference_point.resolve(front) else {
                return Measurement::Undefined(UndefinedReason::DimensionMismatch);
            };
            let point = match &normalizer {
                Some(n) => n.normalize_point(&raw),
                None => raw.clone(),
            };
            debug!(reference_point = ?raw, scaled = ?point, "hypervolume reference point");
            let value = match settings.hypervolume.method {
                HypervolumeMethod::Exact => hypervolume::hypervolume(&approx, &point),
                HypervolumeMethod::MonteCarlo { samples, seed } => {
                    hypervolume::hypervolume_monte_carlo(&approx, &point, samples, seed)
                }
            };
            Measurement::checked(value)
        }
    }
}
