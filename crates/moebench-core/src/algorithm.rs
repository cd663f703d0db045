//! Algorithm trait, per-run context and variants bound to problems.

use std::fmt;
use std::sync::Arc;

use crate::error::EvalError;
use crate::progress::CancellationToken;
use crate::solution::SolutionSet;

/// What a single run gets to see.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repetition index, starting at 0.
    pub run: usize,
    /// Seed derived from the experiment seed, the variant and the repetition.
    pub seed: u64,
    /// Experiment-wide cancellation.
    pub cancel: CancellationToken,
}

/// An optimizer bound to one problem.
///
/// Implementations must be pure functions of the context: the same seed
/// yields the same solution set.
pub trait Algorithm: Send + Sync {
    /// Run to completion and return the final approximation set.
    fn run(&self, ctx: &RunContext) -> Result<SolutionSet, EvalError>;

    /// Name of the algorithm.
    fn name(&self) -> &str;
}

/// An algorithm registered in an experiment under a tag, bound to the
/// problem registered under `problem_tag`.
#[derive(Clone)]
pub struct AlgorithmVariant {
    algorithm: Arc<dyn Algorithm>,
    tag: String,
    problem_tag: String,
}

impl AlgorithmVariant {
    #[must_use]
    pub fn new(
        algorithm: Arc<dyn Algorithm>,
        tag: impl Into<String>,
        problem_tag: impl Into<String>,
    ) -> Self {
        Self {
            algorithm,
            tag: tag.into(),
            problem_tag: problem_tag.into(),
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> &Arc<dyn Algorithm> {
        &self.algorithm
    }

    /// Tag shared by every variant of "the same algorithm".
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn problem_tag(&self) -> &str {
        &self.problem_tag
    }
}

impl fmt::Debug for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmVariant")
            .field("tag", &self.tag)
            .field("problem_tag", &self.problem_tag)
            .field("algorithm", &self.algorithm.name())
            .finish()
    }
}
