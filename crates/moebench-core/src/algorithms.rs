//! Bundled search strategies.
//!
//! Both strategies keep a [`CrowdingArchive`] of the best solutions seen and
//! return it as the run's approximation set. They exist so an experiment can
//! be exercised end to end without an external optimizer.

use std::f64::consts::TAU;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithm::{Algorithm, RunContext};
use crate::archive::CrowdingArchive;
use crate::error::EvalError;
use crate::problem::Problem;
use crate::solution::{Solution, SolutionSet};

/// Evaluations between two cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 64;

/// Parameters of [`RandomSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomSearchParams {
    pub evaluations: usize,
    pub archive_size: usize,
}

impl Default for RandomSearchParams {
    fn default() -> Self {
        Self {
            evaluations: 2_500,
            archive_size: 100,
        }
    }
}

/// Uniform sampling of the decision space.
pub struct RandomSearch {
    problem: Arc<dyn Problem>,
    params: RandomSearchParams,
}

impl RandomSearch {
    #[must_use]
    pub fn new(problem: Arc<dyn Problem>, params: RandomSearchParams) -> Self {
        Self { problem, params }
    }
}

impl Algorithm for RandomSearch {
    fn run(&self, ctx: &RunContext) -> Result<SolutionSet, EvalError> {
        let mut rng = StdRng::seed_from_u64(ctx.seed);
        let mut archive = CrowdingArchive::new(self.params.archive_size);
        for i in 0..self.params.evaluations {
            if i % CANCEL_CHECK_INTERVAL == 0 {
                ctx.cancel.check_cancelled()?;
            }
            archive.add(random_solution(self.problem.as_ref(), &mut rng));
        }
        debug!(run = ctx.run, archived = archive.len(), "random search finished");
        Ok(archive.into_solution_set())
    }

    fn name(&self) -> &str {
        "RandomSearch"
    }
}

/// Parameters of [`MutationSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationSearchParams {
    pub evaluations: usize,
    pub archive_size: usize,
    /// Random samples used to seed the archive.
    pub initial_samples: usize,
    /// Mutation step as a fraction of each variable's range.
    pub step: f64,
}

impl Default for MutationSearchParams {
    fn default() -> Self {
        Self {
            evaluations: 2_500,
            archive_size: 100,
            initial_samples: 100,
            step: 0.1,
        }
    }
}

/// Archive-based Gaussian mutation: pick an archived parent, perturb each
/// variable with probability `1/n`, keep the child if the archive accepts it.
pub struct MutationSearch {
    problem: Arc<dyn Problem>,
    params: MutationSearchParams,
}

impl MutationSearch {
    #[must_use]
    pub fn new(problem: Arc<dyn Problem>, params: MutationSearchParams) -> Self {
        Self { problem, params }
    }

    fn mutate(&self, parent: &Solution, rng: &mut StdRng) -> Vec<f64> {
        let n = parent.variables().len();
        #[allow(clippy::cast_precision_loss)]
        let rate = 1.0 / n.max(1) as f64;
        let forced = rng.gen_range(0..n.max(1));
        parent
            .variables()
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if i != forced && rng.gen::<f64>() >= rate {
                    return x;
                }
                let (lo, hi) = self.problem.bounds(i);
                (x + gaussian(rng) * self.params.step * (hi - lo)).clamp(lo, hi)
            })
            .collect()
    }
}

impl Algorithm for MutationSearch {
    fn run(&self, ctx: &RunContext) -> Result<SolutionSet, EvalError> {
        let mut rng = StdRng::seed_from_u64(ctx.seed);
        let mut archive = CrowdingArchive::new(self.params.archive_size);
        let initial = self.params.initial_samples.clamp(1, self.params.evaluations.max(1));
        for i in 0..self.params.evaluations.max(initial) {
            if i % CANCEL_CHECK_INTERVAL == 0 {
                ctx.cancel.check_cancelled()?;
            }
            let candidate = if i < initial {
                random_solution(self.problem.as_ref(), &mut rng)
            } else {
                let pick = rng.gen_range(0..archive.len().max(1));
                match archive.member(pick) {
                    Some(parent) => {
                        let child = self.mutate(parent, &mut rng);
                        self.problem.create_solution(child)
                    }
                    None => random_solution(self.problem.as_ref(), &mut rng),
                }
            };
            archive.add(candidate);
        }
        debug!(run = ctx.run, archived = archive.len(), "mutation search finished");
        Ok(archive.into_solution_set())
    }

    fn name(&self) -> &str {
        "MutationSearch"
    }
}

fn random_solution(problem: &dyn Problem, rng: &mut StdRng) -> Solution {
    let variables = (0..problem.number_of_variables())
        .map(|i| {
            let (lo, hi) = problem.bounds(i);
            lo + rng.gen::<f64>() * (hi - lo)
        })
        .collect();
    problem.create_solution(variables)
}

// Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Zdt1;
    use crate::progress::CancellationToken;

    fn ctx(seed: u64) -> RunContext {
        RunContext {
            run: 0,
            seed,
            cancel: CancellationToken::new(),
        }
    }

    fn small() -> RandomSearchParams {
        RandomSearchParams {
            evaluations: 200,
            archive_size: 20,
        }
    }

    #[test]
    fn random_search_is_seed_deterministic() {
        let algo = RandomSearch::new(Arc::new(Zdt1::new(5)), small());
        let a = algo.run(&ctx(7)).unwrap();
        let b = algo.run(&ctx(7)).unwrap();
        let c = algo.run(&ctx(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn random_search_respects_bounds_and_archive_size() {
        let algo = RandomSearch::new(Arc::new(Zdt1::new(5)), small());
        let set = algo.run(&ctx(1)).unwrap();
        assert!(!set.is_empty());
        assert!(set.len() <= 20);
        for s in &set {
            assert!(s.variables().iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(s.objectives().len(), 2);
        }
    }

    #[test]
    fn mutation_search_returns_bounded_non_dominated_set() {
        let problem: Arc<dyn Problem> = Arc::new(Zdt1::new(10));
        let params = MutationSearchParams {
            evaluations: 1_000,
            archive_size: 30,
            initial_samples: 50,
            step: 0.1,
        };
        let algo = MutationSearch::new(Arc::clone(&problem), params);
        let set = algo.run(&ctx(3)).unwrap();
        assert_eq!(set, algo.run(&ctx(3)).unwrap());
        assert!(!set.is_empty() && set.len() <= 30);
        let objectives = set.objective_vectors();
        for a in &objectives {
            assert!(!objectives.iter().any(|b| crate::dominance::dominates(b, a)));
        }
        for s in &set {
            assert!(s.variables().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn cancelled_run_fails() {
        let c = ctx(1);
        c.cancel.cancel();
        let algo = RandomSearch::new(Arc::new(Zdt1::new(3)), small());
        assert_eq!(algo.run(&c).unwrap_err(), EvalError::Cancelled);
        let algo = MutationSearch::new(Arc::new(Zdt1::new(3)), MutationSearchParams::default());
        assert_eq!(algo.run(&c).unwrap_err(), EvalError::Cancelled);
    }

    #[test]
    fn gaussian_has_unit_scale() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f64> = (0..20_000).map(|_| gaussian(&mut rng)).collect();
        #[allow(clippy::cast_precision_loss)]
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
    }
}
