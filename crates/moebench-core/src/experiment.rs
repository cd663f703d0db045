//! The immutable experiment description and its builder.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::algorithm::AlgorithmVariant;
use crate::constants::{DEFAULT_BASE_SEED, DEFAULT_INDEPENDENT_RUNS};
use crate::dominance::TiePolicy;
use crate::error::EvalError;
use crate::front::ReferenceFront;
use crate::indicator::{parse_indicators, IndicatorKind};
use crate::options::{HypervolumeMethod, IndicatorSettings, ReferencePoint, StatisticsSettings};
use crate::problem::ExperimentProblem;

/// A validated study: problems, variants, repetitions and assessment
/// settings. Built with [`ExperimentBuilder`].
#[derive(Debug, Clone)]
pub struct Experiment {
    name: String,
    base_directory: PathBuf,
    problems: Vec<ExperimentProblem>,
    variants: Vec<AlgorithmVariant>,
    repetitions: usize,
    workers: usize,
    indicators: Vec<IndicatorKind>,
    indicator_settings: IndicatorSettings,
    statistics: StatisticsSettings,
    reference_fronts: BTreeMap<String, ReferenceFront>,
    tie_policy: TiePolicy,
    base_seed: u64,
    timeout: Option<Duration>,
}

impl Experiment {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// `<base directory>/<name>`.
    #[must_use]
    pub fn output_directory(&self) -> PathBuf {
        self.base_directory.join(&self.name)
    }

    #[must_use]
    pub fn problems(&self) -> &[ExperimentProblem] {
        &self.problems
    }

    #[must_use]
    pub fn problem(&self, tag: &str) -> Option<&ExperimentProblem> {
        self.problems.iter().find(|p| p.tag() == tag)
    }

    #[must_use]
    pub fn variants(&self) -> &[AlgorithmVariant] {
        &self.variants
    }

    /// Variants bound to the problem `tag`, in registration order.
    pub fn variants_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a AlgorithmVariant> {
        self.variants.iter().filter(move |v| v.problem_tag() == tag)
    }

    /// Distinct algorithm tags in first-registration order.
    #[must_use]
    pub fn algorithm_tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.variants
            .iter()
            .map(AlgorithmVariant::tag)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }

    #[must_use]
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of scheduled jobs.
    #[must_use]
    pub fn total_jobs(&self) -> usize {
        self.variants.len() * self.repetitions
    }

    #[must_use]
    pub fn indicators(&self) -> &[IndicatorKind] {
        &self.indicators
    }

    #[must_use]
    pub fn indicator_settings(&self) -> &IndicatorSettings {
        &self.indicator_settings
    }

    #[must_use]
    pub fn statistics(&self) -> &StatisticsSettings {
        &self.statistics
    }

    /// Front supplied for the problem `tag`, if any.
    #[must_use]
    pub fn reference_front(&self, tag: &str) -> Option<&ReferenceFront> {
        self.reference_fronts.get(tag)
    }

    #[must_use]
    pub fn tie_policy(&self) -> TiePolicy {
        self.tie_policy
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Seed of repetition `run` of the variant at `variant_index`.
    ///
    /// Depends only on the base seed and the job coordinates, never on the
    /// pool size or completion order.
    #[must_use]
    pub fn seed_for(&self, variant_index: usize, run: usize) -> u64 {
        let variant = splitmix64(self.base_seed ^ splitmix64(variant_index as u64));
        splitmix64(variant.wrapping_add(run as u64))
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Builder for [`Experiment`]; [`build`](Self::build) validates everything
/// before any job can be scheduled.
#[derive(Debug, Clone)]
pub struct ExperimentBuilder {
    name: String,
    base_directory: PathBuf,
    problems: Vec<ExperimentProblem>,
    variants: Vec<AlgorithmVariant>,
    repetitions: usize,
    workers: Option<usize>,
    indicator_names: Vec<String>,
    indicator_settings: IndicatorSettings,
    statistics: StatisticsSettings,
    reference_fronts: Vec<(String, Vec<Vec<f64>>)>,
    tie_policy: TiePolicy,
    base_seed: u64,
    timeout: Option<Duration>,
}

impl ExperimentBuilder {
    /// Start an experiment called `name` with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_directory: PathBuf::from("."),
            problems: Vec::new(),
            variants: Vec::new(),
            repetitions: DEFAULT_INDEPENDENT_RUNS,
            workers: None,
            indicator_names: IndicatorKind::ALL.iter().map(|k| k.name().to_string()).collect(),
            indicator_settings: IndicatorSettings::default(),
            statistics: StatisticsSettings::default(),
            reference_fronts: Vec::new(),
            tie_policy: TiePolicy::default(),
            base_seed: DEFAULT_BASE_SEED,
            timeout: None,
        }
    }

    #[must_use]
    pub fn base_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_directory = dir.into();
        self
    }

    #[must_use]
    pub fn problem(mut self, problem: ExperimentProblem) -> Self {
        self.problems.push(problem);
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: AlgorithmVariant) -> Self {
        self.variants.push(variant);
        self
    }

    #[must_use]
    pub fn variants(mut self, variants: impl IntoIterator<Item = AlgorithmVariant>) -> Self {
        self.variants.extend(variants);
        self
    }

    #[must_use]
    pub fn repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Worker pool size; defaults to the available parallelism.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Indicator names, resolved against the catalog at build time.
    #[must_use]
    pub fn indicators<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.indicator_names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    #[must_use]
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.statistics.significance_level = alpha;
        self
    }

    #[must_use]
    pub fn statistics(mut self, settings: StatisticsSettings) -> Self {
        self.statistics = settings;
        self
    }

    /// Supply the front of problem `tag` instead of deriving it from runs.
    ///
    /// Every component must be finite. Dominated vectors are dropped at
    /// build time under the experiment's tie policy.
    #[must_use]
    pub fn reference_front(mut self, tag: impl Into<String>, points: Vec<Vec<f64>>) -> Self {
        self.reference_fronts.push((tag.into(), points));
        self
    }

    #[must_use]
    pub fn reference_point(mut self, point: ReferencePoint) -> Self {
        self.indicator_settings.hypervolume.reference_point = point;
        self
    }

    #[must_use]
    pub fn hypervolume_method(mut self, method: HypervolumeMethod) -> Self {
        self.indicator_settings.hypervolume.method = method;
        self
    }

    #[must_use]
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.indicator_settings.normalize = normalize;
        self
    }

    #[must_use]
    pub fn tie_policy(mut self, ties: TiePolicy) -> Self {
        self.tie_policy = ties;
        self
    }

    #[must_use]
    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Experiment-wide deadline; jobs not started by then fail.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and freeze the experiment.
    pub fn build(self) -> Result<Experiment, EvalError> {
        if self.name.trim().is_empty() {
            return Err(config("experiment name must not be empty"));
        }
        if self.repetitions == 0 {
            return Err(config("repetitions must be greater than zero"));
        }
        let workers = match self.workers {
            Some(0) => return Err(config("worker count must be greater than zero")),
            Some(n) => n,
            None => std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        };
        let alpha = self.statistics.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(config(format!(
                "significance level must lie in (0, 1), got {alpha}"
            )));
        }
        let indicators = parse_indicators(&self.indicator_names)?;
        if indicators.is_empty() {
            return Err(config("at least one indicator is required"));
        }
        if self.problems.is_empty() {
            return Err(config("no problems registered"));
        }
        if self.variants.is_empty() {
            return Err(config("no algorithm variants registered"));
        }

        let mut tags = HashSet::new();
        for problem in &self.problems {
            if !tags.insert(problem.tag()) {
                return Err(config(format!("duplicate problem tag: {}", problem.tag())));
            }
        }

        let mut pairs = HashSet::new();
        for variant in &self.variants {
            if !tags.contains(variant.problem_tag()) {
                return Err(config(format!(
                    "variant {} is bound to unregistered problem {}",
                    variant.tag(),
                    variant.problem_tag()
                )));
            }
            if !pairs.insert((variant.tag(), variant.problem_tag())) {
                return Err(config(format!(
                    "duplicate variant {} for problem {}",
                    variant.tag(),
                    variant.problem_tag()
                )));
            }
        }

        if let ReferencePoint::Explicit(point) = &self.indicator_settings.hypervolume.reference_point {
            if let Some(p) = self
                .problems
                .iter()
                .find(|p| p.number_of_objectives() != point.len())
            {
                return Err(config(format!(
                    "reference point has {} components but {} has {} objectives",
                    point.len(),
                    p.tag(),
                    p.number_of_objectives()
                )));
            }
        }

        let mut reference_fronts = BTreeMap::new();
        for (tag, points) in self.reference_fronts {
            let Some(problem) = self.problems.iter().find(|p| p.tag() == tag) else {
                return Err(config(format!("reference front for unknown problem {tag}")));
            };
            let supplied = ReferenceFront::new(points, problem.number_of_objectives())
                .map_err(|e| config(format!("reference front for {tag}: {e}")))?;
            let given = supplied.len();
            let front = supplied.into_non_dominated(self.tie_policy);
            if front.len() < given {
                warn!(
                    problem = %tag,
                    removed = given - front.len(),
                    "supplied reference front contained dominated vectors"
                );
            }
            reference_fronts.insert(tag, front);
        }

        Ok(Experiment {
            name: self.name,
            base_directory: self.base_directory,
            problems: self.problems,
            variants: self.variants,
            repetitions: self.repetitions,
            workers,
            indicators,
            indicator_settings: self.indicator_settings,
            statistics: self.statistics.normalize(),
            reference_fronts,
            tie_policy: self.tie_policy,
            base_seed: self.base_seed,
            timeout: self.timeout,
        })
    }
}

fn config(msg: impl Into<String>) -> EvalError {
    EvalError::Config(msg.into())
}
