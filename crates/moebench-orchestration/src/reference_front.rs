//! Reference front construction per problem.

use serde::Serialize;
use tracing::info;

use moebench_core::dominance::{self, TiePolicy};
use moebench_core::error::EvalError;
use moebench_core::experiment::Experiment;
use moebench_core::front::ReferenceFront;
use moebench_core::indicator::IndicatorKind;

use crate::interfaces::Run;

/// The ground truth used to score the runs of one problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemReference {
    pub problem: String,
    pub front: ReferenceFront,
    /// Decision vectors of the solutions that make up the front; empty for
    /// supplied fronts.
    pub pareto_set: Vec<Vec<f64>>,
    /// Whether the front was supplied rather than derived from runs.
    pub supplied: bool,
    /// Hypervolume reference point resolved against the front, in raw
    /// objective units; `None` when HV is not selected.
    pub hypervolume_reference: Option<Vec<f64>>,
}

/// Build the reference of every problem, in registration order.
///
/// Supplied fronts, already filtered by the builder, are used unchanged.
/// Otherwise the objective vectors of all successful runs bound to the
/// problem are pooled in run order and reduced to their non-dominated subset.
pub fn build_reference_fronts(
    experiment: &Experiment,
    runs: &[Run],
) -> Result<Vec<ProblemReference>, EvalError> {
    experiment
        .problems()
        .iter()
        .map(|problem| {
            let tag = problem.tag();
            let mut reference = if let Some(front) = experiment.reference_front(tag) {
                ProblemReference {
                    problem: tag.to_string(),
                    front: front.clone(),
                    pareto_set: Vec::new(),
                    supplied: true,
                    hypervolume_reference: None,
                }
            } else {
                let pooled = runs
                    .iter()
                    .filter(|r| r.problem == tag)
                    .filter_map(Run::solutions)
                    .flat_map(|set| set.iter());
                let (objectives, variables): (Vec<Vec<f64>>, Vec<Vec<f64>>) = pooled
                    .map(|s| (s.objectives().to_vec(), s.variables().to_vec()))
                    .unzip();
                derive_reference(
                    tag,
                    objectives,
                    variables,
                    problem.number_of_objectives(),
                    experiment.tie_policy(),
                )?
            };
            reference.hypervolume_reference = experiment
                .indicators()
                .contains(&IndicatorKind::Hypervolume)
                .then(|| {
                    experiment
                        .indicator_settings()
                        .hypervolume
                        .reference_point
                        .resolve(&reference.front)
                })
                .flatten();
            info!(
                problem = tag,
                points = reference.front.len(),
                supplied = reference.supplied,
                degenerate = reference.front.is_degenerate(),
                hv_reference = ?reference.hypervolume_reference,
                "reference front ready"
            );
            Ok(reference)
        })
        .collect()
}

/// Reduce a pool of (objectives, variables) pairs to a reference front and
/// the matching Pareto set.
///
/// Pools with fewer than two distinct objective vectors are kept verbatim.
pub fn derive_reference(
    problem: &str,
    objectives: Vec<Vec<f64>>,
    variables: Vec<Vec<f64>>,
    number_of_objectives: usize,
    ties: TiePolicy,
) -> Result<ProblemReference, EvalError> {
    let keep: Vec<usize> = if dominance::distinct_count(&objectives) < 2 {
        (0..objectives.len()).collect()
    } else {
        dominance::non_dominated_indices(&objectives, ties)
    };
    let points = keep.iter().map(|&i| objectives[i].clone()).collect();
    let pareto_set = keep
        .iter()
        .filter_map(|&i| variables.get(i).cloned())
        .collect();
    Ok(ProblemReference {
        problem: problem.to_string(),
        front: ReferenceFront::new(points, number_of_objectives)?,
        pareto_set,
        supplied: false,
        hypervolume_reference: None,
    })
}
