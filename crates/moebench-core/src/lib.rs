//! # moebench-core
//!
//! Core library for benchmarking multi-objective optimizers: the experiment
//! model, Pareto dominance, quality indicators (including exact hypervolume)
//! and the non-parametric statistics used to compare algorithms.

pub mod algorithm;
pub mod algorithms;
pub mod archive;
pub mod constants;
pub mod distance;
pub mod dominance;
pub mod epsilon;
pub mod error;
pub mod experiment;
pub mod friedman;
pub mod front;
pub mod hypervolume;
pub mod indicator;
pub mod observer;
pub mod observers;
pub mod options;
pub mod problem;
pub mod problems;
pub mod progress;
pub mod ranking;
pub mod registry;
pub mod solution;
pub mod special;
pub mod spread;
pub mod summary;
pub mod table;
pub mod wilcoxon;

// Re-exports
pub use algorithm::{Algorithm, AlgorithmVariant, RunContext};
pub use constants::{
    exit_codes, DEFAULT_BASE_SEED, DEFAULT_INDEPENDENT_RUNS, DEFAULT_SIGNIFICANCE_LEVEL,
};
pub use dominance::TiePolicy;
pub use error::EvalError;
pub use experiment::{Experiment, ExperimentBuilder};
pub use front::ReferenceFront;
pub use indicator::{IndicatorKind, Measurement, UndefinedReason};
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::{
    HypervolumeMethod, HypervolumeSettings, IndicatorSettings, ReferencePoint, StatisticsSettings,
};
pub use problem::{ExperimentProblem, Problem};
pub use progress::{CancellationToken, ProgressUpdate};
pub use registry::{AlgorithmFactory, DefaultAlgorithmFactory, DefaultProblemFactory, ProblemFactory};
pub use solution::{Solution, SolutionSet};
pub use table::{CellKey, IndicatorTable, IndicatorValue};

/// Score `approximation` against `front` with default settings.
///
/// Convenience wrapper around [`indicator::evaluate`]; use it directly to
/// control normalization and the hypervolume reference point.
///
/// # Example
/// ```
/// use moebench_core::{assess, IndicatorKind, ReferenceFront};
///
/// let front = ReferenceFront::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 2).unwrap();
/// let gd = assess(IndicatorKind::GenerationalDistance, &front, front.points());
/// assert_eq!(gd.value(), Some(0.0));
/// ```
#[must_use]
pub fn assess(
    kind: IndicatorKind,
    front: &ReferenceFront,
    approximation: &[Vec<f64>],
) -> Measurement {
    indicator::evaluate(kind, front, approximation, &IndicatorSettings::default())
}
