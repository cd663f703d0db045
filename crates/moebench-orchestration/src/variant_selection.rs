//! Variant selection: expand algorithm and problem names into the variants of
//! an experiment.

use moebench_core::algorithm::AlgorithmVariant;
use moebench_core::error::EvalError;
use moebench_core::problem::ExperimentProblem;
use moebench_core::registry::{AlgorithmFactory, ProblemFactory};

/// Resolve problem names; `"all"` selects every problem of the factory.
pub fn get_problems(
    names: &[String],
    factory: &dyn ProblemFactory,
) -> Result<Vec<ExperimentProblem>, EvalError> {
    let names: Vec<String> = if names.iter().any(|n| n == "all") {
        factory.available().into_iter().map(str::to_string).collect()
    } else {
        names.to_vec()
    };
    names
        .iter()
        .map(|name| Ok(ExperimentProblem::untagged(factory.get(name)?)))
        .collect()
}

/// Bind every algorithm to every problem; `"all"` selects every algorithm of
/// the factory. The algorithm name is the variant tag.
pub fn get_variants(
    algorithms: &[String],
    problems: &[ExperimentProblem],
    factory: &dyn AlgorithmFactory,
) -> Result<Vec<AlgorithmVariant>, EvalError> {
    let names: Vec<String> = if algorithms.iter().any(|a| a == "all") {
        factory.available().into_iter().map(str::to_string).collect()
    } else {
        algorithms.to_vec()
    };
    let mut variants = Vec::with_capacity(names.len() * problems.len());
    for problem in problems {
        for name in &names {
            let algorithm = factory.create(name, std::sync::Arc::clone(problem.problem()))?;
            variants.push(AlgorithmVariant::new(algorithm, name.as_str(), problem.tag()));
        }
    }
    Ok(variants)
}
