//! Name-based factories for problems and algorithms.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::algorithm::Algorithm;
use crate::algorithms::{MutationSearch, MutationSearchParams, RandomSearch, RandomSearchParams};
use crate::error::EvalError;
use crate::problem::Problem;
use crate::problems::{Schaffer, Zdt1, Zdt2};

/// Factory trait for benchmark problems.
pub trait ProblemFactory: Send + Sync {
    /// Get or create a problem by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Problem>, EvalError>;

    /// List all available problem names.
    fn available(&self) -> Vec<&str>;
}

/// Problem factory with lazy creation and cache.
pub struct DefaultProblemFactory {
    variables: usize,
    cache: RwLock<HashMap<String, Arc<dyn Problem>>>,
}

impl DefaultProblemFactory {
    /// Create a factory whose ZDT problems have `variables` decision
    /// variables.
    #[must_use]
    pub fn new(variables: usize) -> Self {
        Self {
            variables,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_problem(&self, name: &str) -> Result<Arc<dyn Problem>, EvalError> {
        match name {
            "zdt1" => Ok(Arc::new(Zdt1::new(self.variables))),
            "zdt2" => Ok(Arc::new(Zdt2::new(self.variables))),
            "schaffer" => Ok(Arc::new(Schaffer)),
            _ => Err(EvalError::Config(format!("unknown problem: {name}"))),
        }
    }
}

impl Default for DefaultProblemFactory {
    fn default() -> Self {
        Self::new(30)
    }
}

impl ProblemFactory for DefaultProblemFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Problem>, EvalError> {
        let key = name.to_ascii_lowercase();
        if let Some(problem) = self.cache.read().get(&key) {
            return Ok(Arc::clone(problem));
        }

        let problem = self.create_problem(&key)?;
        self.cache.write().insert(key, Arc::clone(&problem));
        Ok(problem)
    }

    fn available(&self) -> Vec<&str> {
        vec!["zdt1", "zdt2", "schaffer"]
    }
}

/// Factory trait for algorithms bound to a problem.
pub trait AlgorithmFactory: Send + Sync {
    /// Create the algorithm `name` for `problem`.
    fn create(&self, name: &str, problem: Arc<dyn Problem>)
        -> Result<Arc<dyn Algorithm>, EvalError>;

    /// List all available algorithm names.
    fn available(&self) -> Vec<&str>;
}

/// Builds the bundled strategies from their parameter structs.
#[derive(Debug, Clone, Default)]
pub struct DefaultAlgorithmFactory {
    pub random: RandomSearchParams,
    pub mutation: MutationSearchParams,
}

impl DefaultAlgorithmFactory {
    /// Both strategies with `evaluations` evaluations per run.
    #[must_use]
    pub fn with_evaluations(evaluations: usize) -> Self {
        Self {
            random: RandomSearchParams {
                evaluations,
                ..RandomSearchParams::default()
            },
            mutation: MutationSearchParams {
                evaluations,
                ..MutationSearchParams::default()
            },
        }
    }
}

impl AlgorithmFactory for DefaultAlgorithmFactory {
    fn create(
        &self,
        name: &str,
        problem: Arc<dyn Problem>,
    ) -> Result<Arc<dyn Algorithm>, EvalError> {
        match name.to_ascii_lowercase().as_str() {
            "random" => Ok(Arc::new(RandomSearch::new(problem, self.random))),
            "mutation" => Ok(Arc::new(MutationSearch::new(problem, self.mutation))),
            other => Err(EvalError::Config(format!("unknown algorithm: {other}"))),
        }
    }

    fn available(&self) -> Vec<&str> {
        vec!["random", "mutation"]
    }
}
