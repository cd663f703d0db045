//! Problem trait and the tagged problem entries of an experiment.

use std::fmt;
use std::sync::Arc;

use crate::solution::Solution;

/// A multi-objective minimization problem over a box-bounded real domain.
pub trait Problem: Send + Sync {
    /// Name of the problem family.
    fn name(&self) -> &str;

    /// Number of decision variables.
    fn number_of_variables(&self) -> usize;

    /// Number of objectives.
    fn number_of_objectives(&self) -> usize;

    /// Lower and upper bound of the decision variable at `index`.
    fn bounds(&self, index: usize) -> (f64, f64);

    /// Evaluate a decision vector.
    fn evaluate(&self, variables: &[f64]) -> Vec<f64>;

    /// Evaluate `variables` and wrap the result into a [`Solution`].
    fn create_solution(&self, variables: Vec<f64>) -> Solution {
        let objectives = self.evaluate(&variables);
        Solution::new(variables, objectives)
    }
}

/// A problem registered in an experiment under a unique tag.
#[derive(Clone)]
pub struct ExperimentProblem {
    problem: Arc<dyn Problem>,
    tag: String,
}

impl ExperimentProblem {
    /// Register `problem` under `tag`.
    #[must_use]
    pub fn new(problem: Arc<dyn Problem>, tag: impl Into<String>) -> Self {
        Self {
            problem,
            tag: tag.into(),
        }
    }

    /// Register `problem` under its own name.
    #[must_use]
    pub fn untagged(problem: Arc<dyn Problem>) -> Self {
        let tag = problem.name().to_string();
        Self { problem, tag }
    }

    /// The tag identifying this problem in the experiment.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The underlying problem.
    #[must_use]
    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    /// Objective count of the underlying problem.
    #[must_use]
    pub fn number_of_objectives(&self) -> usize {
        self.problem.number_of_objectives()
    }
}

impl fmt::Debug for ExperimentProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentProblem")
            .field("tag", &self.tag)
            .field("problem", &self.problem.name())
            .field("objectives", &self.problem.number_of_objectives())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Zdt1;

    #[test]
    fn tagged_problem_keeps_tag() {
        let p = ExperimentProblem::new(Arc::new(Zdt1::new(10)), "ZDT110");
        assert_eq!(p.tag(), "ZDT110");
        assert_eq!(p.problem().name(), "ZDT1");
        assert_eq!(p.number_of_objectives(), 2);
    }

    #[test]
    fn untagged_problem_uses_name() {
        let p = ExperimentProblem::untagged(Arc::new(Zdt1::new(5)));
        assert_eq!(p.tag(), "ZDT1");
    }

    #[test]
    fn create_solution_evaluates() {
        let zdt = Zdt1::new(3);
        let s = zdt.create_solution(vec![0.25, 0.0, 0.0]);
        assert_eq!(s.variables(), &[0.25, 0.0, 0.0]);
        assert!((s.objectives()[0] - 0.25).abs() < 1e-12);
        assert!((s.objectives()[1] - 0.5).abs() < 1e-12);
    }
}
