//! Solutions and solution sets produced by algorithm runs.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// A single candidate: decision variables and the objective values they map to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    variables: Vec<f64>,
    objectives: Vec<f64>,
}

impl Solution {
    /// Create a solution from its decision variables and objective values.
    #[must_use]
    pub fn new(variables: Vec<f64>, objectives: Vec<f64>) -> Self {
        Self {
            variables,
            objectives,
        }
    }

    /// Decision-variable values.
    #[must_use]
    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Objective values (all minimized).
    #[must_use]
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }
}

/// The unordered result of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
}

impl SolutionSet {
    /// Wrap a list of solutions.
    #[must_use]
    pub fn new(solutions: Vec<Solution>) -> Self {
        Self { solutions }
    }

    /// Number of solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether the set holds no solution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Borrow the solutions.
    #[must_use]
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Iterate over the solutions.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    /// Objective matrix, one row per solution.
    #[must_use]
    pub fn objective_vectors(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.objectives.clone())
            .collect()
    }

    /// Decision-variable matrix, one row per solution.
    #[must_use]
    pub fn variable_vectors(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.variables.clone())
            .collect()
    }

    /// Check that the set is non-empty and every objective vector has
    /// `expected` finite components.
    pub fn validate(&self, expected: usize) -> Result<(), EvalError> {
        if self.solutions.is_empty() {
            return Err(EvalError::EmptySolutionSet);
        }
        if let Some(bad) = self
            .solutions
            .iter()
            .find(|s| s.objectives.len() != expected)
        {
            return Err(EvalError::DimensionMismatch {
                expected,
                found: bad.objectives.len(),
            });
        }
        if let Some(index) = self
            .solutions
            .iter()
            .position(|s| s.objectives.iter().any(|v| !v.is_finite()))
        {
            return Err(EvalError::NonFiniteObjective { index });
        }
        Ok(())
    }
}

impl FromIterator<Solution> for SolutionSet {
    fn from_iter<I: IntoIterator<Item = Solution>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}
