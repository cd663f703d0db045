//! Benchmark problems used by the bundled experiments.
//!
//! ZDT1 and ZDT2 (Zitzler, Deb, Thiele, 2000) and Schaffer's single-variable
//! problem. All objectives are minimized.

use crate::problem::Problem;

fn zdt_g(variables: &[f64]) -> f64 {
    let n = variables.len();
    if n < 2 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let tail = variables[1..].iter().sum::<f64>() / (n - 1) as f64;
    1.0 + 9.0 * tail
}

/// ZDT1: convex front `f2 = 1 - sqrt(f1)`.
#[derive(Debug, Clone)]
pub struct Zdt1 {
    variables: usize,
}

impl Zdt1 {
    /// Create ZDT1 with `variables` decision variables (at least one).
    #[must_use]
    pub fn new(variables: usize) -> Self {
        Self {
            variables: variables.max(1),
        }
    }

    /// `points` evenly spaced samples of the true Pareto front.
    #[must_use]
    pub fn true_front(points: usize) -> Vec<Vec<f64>> {
        sample_front(points, |f1| 1.0 - f1.sqrt())
    }
}

impl Problem for Zdt1 {
    fn name(&self) -> &str {
        "ZDT1"
    }

    fn number_of_variables(&self) -> usize {
        self.variables
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn bounds(&self, _index: usize) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn evaluate(&self, variables: &[f64]) -> Vec<f64> {
        let f1 = variables[0];
        let g = zdt_g(variables);
        let h = 1.0 - (f1 / g).sqrt();
        vec![f1, g * h]
    }
}

/// ZDT2: concave front `f2 = 1 - f1^2`.
#[derive(Debug, Clone)]
pub struct Zdt2 {
    variables: usize,
}

impl Zdt2 {
    /// Create ZDT2 with `variables` decision variables (at least one).
    #[must_use]
    pub fn new(variables: usize) -> Self {
        Self {
            variables: variables.max(1),
        }
    }

    /// `points` evenly spaced samples of the true Pareto front.
    #[must_use]
    pub fn true_front(points: usize) -> Vec<Vec<f64>> {
        sample_front(points, |f1| 1.0 - f1 * f1)
    }
}

impl Problem for Zdt2 {
    fn name(&self) -> &str {
        "ZDT2"
    }

    fn number_of_variables(&self) -> usize {
        self.variables
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn bounds(&self, _index: usize) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn evaluate(&self, variables: &[f64]) -> Vec<f64> {
        let f1 = variables[0];
        let g = zdt_g(variables);
        let ratio = f1 / g;
        vec![f1, g * (1.0 - ratio * ratio)]
    }
}

/// Schaffer N.1: `f1 = x^2`, `f2 = (x - 2)^2`, `x` in [-10, 10].
#[derive(Debug, Clone, Default)]
pub struct Schaffer;

impl Problem for Schaffer {
    fn name(&self) -> &str {
        "Schaffer"
    }

    fn number_of_variables(&self) -> usize {
        1
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn bounds(&self, _index: usize) -> (f64, f64) {
        (-10.0, 10.0)
    }

    fn evaluate(&self, variables: &[f64]) -> Vec<f64> {
        let x = variables[0];
        vec![x * x, (x - 2.0) * (x - 2.0)]
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample_front(points: usize, f2: impl Fn(f64) -> f64) -> Vec<Vec<f64>> {
    match points {
        0 => Vec::new(),
        1 => vec![vec![0.0, f2(0.0)]],
        _ => (0..points)
            .map(|i| {
                let f1 = i as f64 / (points - 1) as f64;
                vec![f1, f2(f1)]
            })
            .collect(),
    }
}
