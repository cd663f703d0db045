//! Indicator computation for every successful run.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::info;

use moebench_core::error::EvalError;
use moebench_core::experiment::Experiment;
use moebench_core::indicator::{self, Measurement};
use moebench_core::table::{CellKey, IndicatorTable};

use crate::interfaces::Run;
use crate::reference_front::ProblemReference;

/// Score every successful run with every configured indicator.
///
/// Runs in parallel on the current rayon pool; the table is assembled in
/// key order afterwards, so the result does not depend on scheduling. Failed
/// runs contribute no cells.
pub fn compute_indicators(
    experiment: &Experiment,
    runs: &[Run],
    references: &[ProblemReference],
) -> Result<IndicatorTable, EvalError> {
    let settings = experiment.indicator_settings();
    let jobs: Vec<(&Run, &ProblemReference)> = runs
        .iter()
        .filter(|r| r.succeeded())
        .filter_map(|r| {
            references
                .iter()
                .find(|p| p.problem == r.problem)
                .map(|p| (r, p))
        })
        .collect();

    let cells: Vec<(CellKey, Measurement)> = jobs
        .into_par_iter()
        .flat_map_iter(|(run, reference)| {
            let approximation = run
                .solutions()
                .map(moebench_core::solution::SolutionSet::objective_vectors)
                .unwrap_or_default();
            experiment
                .indicators()
                .iter()
                .map(|&kind| {
                    let key = CellKey {
                        indicator: kind,
                        problem: run.problem.clone(),
                        algorithm: run.algorithm.clone(),
                        run: run.run,
                    };
                    let value = indicator::evaluate(kind, &reference.front, &approximation, settings);
                    (key, value)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut table = IndicatorTable::new();
    for (key, value) in cells {
        table.insert(key, value)?;
    }
    let undefined = table.iter().filter(|(_, m)| !m.is_defined()).count();
    info!(cells = table.len(), undefined, "indicator table complete");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::reference_front::derive_reference;
    use moebench_core::algorithm::AlgorithmVariant;
    use moebench_core::algorithms::{RandomSearch, RandomSearchParams};
    use moebench_core::dominance::TiePolicy;
    use moebench_core::experiment::ExperimentBuilder;
    use moebench_core::indicator::{IndicatorKind, UndefinedReason};
    use moebench_core::options::ReferencePoint;
    use moebench_core::problem::{ExperimentProblem, Problem};
    use moebench_core::problems::Zdt1;
    use moebench_core::solution::{Solution, SolutionSet};

    fn experiment() -> Experiment {
        let p: Arc<dyn Problem> = Arc::new(Zdt1::new(2));
        let algo = Arc::new(RandomSearch::new(Arc::clone(&p), RandomSearchParams::default()));
        ExperimentBuilder::new("quality")
            .problem(ExperimentProblem::untagged(p))
            .variant(AlgorithmVariant::new(algo.clone(), "A", "ZDT1"))
            .variant(AlgorithmVariant::new(algo, "B", "ZDT1"))
            .indicators(&["GD", "HV"])
            .normalize(false)
            .reference_point(ReferencePoint::Explicit(vec![1.1, 1.1]))
            .repetitions(2)
            .workers(2)
            .build()
            .unwrap()
    }

    fn run(algorithm: &str, index: usize, points: &[[f64; 2]]) -> Run {
        Run {
            variant_index: 0,
            algorithm: algorithm.into(),
            problem: "ZDT1".into(),
            run: index,
            seed: 0,
            outcome: Ok(points
                .iter()
                .map(|p| Solution::new(vec![p[0]], p.to_vec()))
                .collect::<SolutionSet>()),
            duration: Duration::ZERO,
        }
    }

    fn reference() -> ProblemReference {
        derive_reference(
            "ZDT1",
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            Vec::new(),
            2,
            TiePolicy::KeepAll,
        )
        .unwrap()
    }

    #[test]
    fn one_cell_per_run_and_indicator() {
        let runs = vec![
            run("A", 0, &[[0.0, 1.0], [1.0, 0.0]]),
            run("A", 1, &[[0.5, 0.5]]),
            run("B", 0, &[[0.2, 1.0]]),
            run("B", 1, &[[1.0, 1.0]]),
        ];
        let table = compute_indicators(&experiment(), &runs, &[reference()]).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table.count(IndicatorKind::Hypervolume, "ZDT1"), 4);
        let hv = table.samples(IndicatorKind::Hypervolume, "ZDT1", "A");
        assert!((hv[0] - 0.21).abs() < 1e-12);
        assert_eq!(
            table.samples(IndicatorKind::GenerationalDistance, "ZDT1", "A")[0],
            0.0
        );
    }

    #[test]
    fn failed_runs_have_no_cells() {
        let mut failed = run("B", 0, &[]);
        failed.outcome = Err(EvalError::Cancelled);
        let runs = vec![run("A", 0, &[[0.5, 0.5]]), failed];
        let table = compute_indicators(&experiment(), &runs, &[reference()]).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn degenerate_front_gives_undefined_cells() {
        let degenerate = derive_reference(
            "ZDT1",
            vec![vec![0.5, 0.5]],
            Vec::new(),
            2,
            TiePolicy::KeepAll,
        )
        .unwrap();
        let runs = vec![run("A", 0, &[[0.5, 0.5]])];
        let table = compute_indicators(&experiment(), &runs, &[degenerate]).unwrap();
        assert!(table.iter().all(|(_, m)| m
            == Measurement::Undefined(UndefinedReason::DegenerateFront)));
    }

    #[test]
    fn parallel_and_sequential_tables_match() {
        let runs: Vec<Run> = (0..2)
            .flat_map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = 0.1 * i as f64;
                [run("A", i, &[[x, 1.0 - x]]), run("B", i, &[[x + 0.2, 1.0]])]
            })
            .collect();
        let exp = experiment();
        let pool = crate::scheduler::build_pool(4).unwrap();
        let parallel = pool.install(|| compute_indicators(&exp, &runs, &[reference()])).unwrap();
        let single = crate::scheduler::build_pool(1).unwrap();
        let sequential = single.install(|| compute_indicators(&exp, &runs, &[reference()])).unwrap();
        assert_eq!(parallel, sequential);
    }
}
