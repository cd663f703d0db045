//! Parallel execution of every (variant, repetition) job.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use moebench_core::algorithm::{AlgorithmVariant, RunContext};
use moebench_core::error::EvalError;
use moebench_core::experiment::Experiment;
use moebench_core::observer::ProgressObserver;
use moebench_core::progress::{CancellationToken, ProgressUpdate};
use moebench_core::solution::SolutionSet;

use crate::interfaces::{Run, RunWriter};

/// Build the fixed-size worker pool of an experiment.
pub fn build_pool(workers: usize) -> Result<ThreadPool, EvalError> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("moebench-worker-{i}"))
        .build()
        .map_err(|e| EvalError::Config(format!("cannot build worker pool: {e}")))
}

/// Execute all jobs of `experiment` on `pool`.
///
/// Jobs are submitted variants-outer, repetitions-inner and the returned runs
/// follow that order regardless of completion order. Failures are recorded in
/// the run instead of aborting siblings; jobs that have not started when the
/// token is cancelled or the experiment deadline passes fail without running.
pub fn execute_runs(
    experiment: &Experiment,
    pool: &ThreadPool,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
    writer: &dyn RunWriter,
) -> Vec<Run> {
    let token = match experiment.timeout() {
        Some(timeout) => cancel.with_timeout(timeout),
        None => cancel.clone(),
    };
    let jobs: Vec<(usize, usize)> = (0..experiment.variants().len())
        .flat_map(|v| (0..experiment.repetitions()).map(move |r| (v, r)))
        .collect();
    let total = jobs.len();
    let completed = AtomicUsize::new(0);

    info!(
        experiment = experiment.name(),
        jobs = total,
        workers = pool.current_num_threads(),
        "scheduling runs"
    );

    let runs: Vec<Run> = pool.install(|| {
        jobs.into_par_iter()
            .enumerate()
            .map(|(job_index, (variant_index, run))| {
                let variant = &experiment.variants()[variant_index];
                let seed = experiment.seed_for(variant_index, run);
                let result = execute_job(experiment, variant_index, run, seed, &token);
                if let Err(e) = &result.outcome {
                    warn!(
                        algorithm = variant.tag(),
                        problem = variant.problem_tag(),
                        run,
                        error = %e,
                        "run failed"
                    );
                } else if let Some(set) = result.solutions() {
                    persist(writer, &result, set);
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                observer.on_progress(&ProgressUpdate {
                    job_index,
                    algorithm: result.algorithm.clone(),
                    problem: result.problem.clone(),
                    run,
                    completed: done,
                    total,
                    succeeded: result.succeeded(),
                    duration: result.duration,
                });
                result
            })
            .collect()
    });

    let failed = runs.iter().filter(|r| !r.succeeded()).count();
    info!(runs = runs.len(), failed, "runs finished");
    runs
}

fn execute_job(
    experiment: &Experiment,
    variant_index: usize,
    run: usize,
    seed: u64,
    token: &CancellationToken,
) -> Run {
    let variant: &AlgorithmVariant = &experiment.variants()[variant_index];
    let start = Instant::now();
    let outcome = token.check_cancelled().and_then(|()| {
        let ctx = RunContext {
            run,
            seed,
            cancel: token.clone(),
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| variant.algorithm().run(&ctx)))
            .unwrap_or_else(|payload| {
                Err(EvalError::AlgorithmFailure(format!(
                    "panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });
        let objectives = experiment
            .problem(variant.problem_tag())
            .map_or(0, moebench_core::problem::ExperimentProblem::number_of_objectives);
        result.and_then(|set| validate(set, objectives))
    });
    let duration = start.elapsed();
    debug!(
        algorithm = variant.tag(),
        problem = variant.problem_tag(),
        run,
        ok = outcome.is_ok(),
        elapsed_ms = duration.as_millis(),
        "job finished"
    );
    Run {
        variant_index,
        algorithm: variant.tag().to_string(),
        problem: variant.problem_tag().to_string(),
        run,
        seed,
        outcome,
        duration,
    }
}

fn validate(set: SolutionSet, objectives: usize) -> Result<SolutionSet, EvalError> {
    match set.validate(objectives) {
        Ok(()) => Ok(set),
        Err(
            e @ (EvalError::EmptySolutionSet
            | EvalError::DimensionMismatch { .. }
            | EvalError::NonFiniteObjective { .. }),
        ) => Err(EvalError::AlgorithmFailure(e.to_string())),
        Err(e) => Err(e),
    }
}

fn persist(writer: &dyn RunWriter, run: &Run, set: &SolutionSet) {
    if let Err(e) = writer.write_run(&run.algorithm, &run.problem, run.run, set) {
        warn!(
            algorithm = %run.algorithm,
            problem = %run.problem,
            run = run.run,
            error = %e,
            "failed to write run"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::interfaces::NullRunWriter;
    use crate::comparison::StatisticsReport;
    use crate::reference_front::ProblemReference;
    use moebench_core::algorithm::Algorithm;
    use moebench_core::algorithms::{RandomSearch, RandomSearchParams};
    use moebench_core::experiment::ExperimentBuilder;
    use moebench_core::observers::{ChannelObserver, NoOpObserver};
    use moebench_core::problem::{ExperimentProblem, Problem};
    use moebench_core::problems::Zdt1;
    use moebench_core::solution::Solution;
    use moebench_core::table::IndicatorTable;

    enum Behaviour {
        Fail,
        Panic,
        Empty,
        WrongDimension,
        NonFinite,
    }

    struct Broken(Behaviour);

    impl Algorithm for Broken {
        fn run(&self, _ctx: &RunContext) -> Result<SolutionSet, EvalError> {
            match self.0 {
                Behaviour::Fail => Err(EvalError::AlgorithmFailure("diverged".into())),
                Behaviour::Panic => panic!("boom"),
                Behaviour::Empty => Ok(SolutionSet::default()),
                Behaviour::WrongDimension => Ok(SolutionSet::new(vec![Solution::new(
                    vec![0.0],
                    vec![0.0, 1.0, 2.0],
                )])),
                Behaviour::NonFinite => Ok(SolutionSet::new(vec![Solution::new(
                    vec![0.0],
                    vec![f64::NAN, -1.0],
                )])),
            }
        }

        fn name(&self) -> &str {
            "Broken"
        }
    }

    fn zdt1() -> Arc<dyn Problem> {
        Arc::new(Zdt1::new(4))
    }

    fn random(problem: &Arc<dyn Problem>) -> Arc<dyn Algorithm> {
        Arc::new(RandomSearch::new(
            Arc::clone(problem),
            RandomSearchParams {
                evaluations: 100,
                archive_size: 10,
            },
        ))
    }

    fn experiment(workers: usize) -> Experiment {
        let problem = zdt1();
        ExperimentBuilder::new("sched")
            .problem(ExperimentProblem::untagged(Arc::clone(&problem)))
            .variant(AlgorithmVariant::new(random(&problem), "A", "ZDT1"))
            .variant(AlgorithmVariant::new(random(&problem), "B", "ZDT1"))
            .repetitions(4)
            .workers(workers)
            .base_seed(5)
            .build()
            .unwrap()
    }

    fn run_all(exp: &Experiment) -> Vec<Run> {
        let pool = build_pool(exp.workers()).unwrap();
        execute_runs(
            exp,
            &pool,
            &CancellationToken::new(),
            &NoOpObserver::new(),
            &NullRunWriter,
        )
    }

    #[test]
    fn runs_follow_submission_order() {
        let runs = run_all(&experiment(4));
        let order: Vec<(&str, usize)> = runs.iter().map(|r| (r.algorithm.as_str(), r.run)).collect();
        assert_eq!(
            order,
            vec![
                ("A", 0), ("A", 1), ("A", 2), ("A", 3),
                ("B", 0), ("B", 1), ("B", 2), ("B", 3),
            ]
        );
        assert!(runs.iter().all(Run::succeeded));
        assert_eq!(runs[5].variant_index, 1);
    }

    #[test]
    fn pool_size_does_not_change_results() {
        let single = run_all(&experiment(1));
        let many = run_all(&experiment(8));
        assert_eq!(single.len(), many.len());
        for (a, b) in single.iter().zip(&many) {
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.solutions(), b.solutions());
        }
    }

    #[test]
    fn failures_are_recorded_without_aborting_siblings() {
        let problem = zdt1();
        let mut builder = ExperimentBuilder::new("broken")
            .problem(ExperimentProblem::untagged(Arc::clone(&problem)))
            .variant(AlgorithmVariant::new(random(&problem), "ok", "ZDT1"))
            .repetitions(2)
            .workers(3);
        for (tag, behaviour) in [
            ("fail", Behaviour::Fail),
            ("panic", Behaviour::Panic),
            ("empty", Behaviour::Empty),
            ("dim", Behaviour::WrongDimension),
            ("nan", Behaviour::NonFinite),
        ] {
            builder = builder.variant(AlgorithmVariant::new(Arc::new(Broken(behaviour)), tag, "ZDT1"));
        }
        let runs = run_all(&builder.build().unwrap());
        assert_eq!(runs.len(), 12);
        for run in &runs {
            match run.algorithm.as_str() {
                "ok" => assert!(run.succeeded()),
                "nan" => assert!(matches!(
                    &run.outcome,
                    Err(EvalError::AlgorithmFailure(msg)) if msg.contains("non-finite")
                )),
                "panic" => assert!(matches!(
                    &run.outcome,
                    Err(EvalError::AlgorithmFailure(msg)) if msg.contains("boom")
                )),
                _ => assert!(matches!(run.outcome, Err(EvalError::AlgorithmFailure(_)))),
            }
        }
    }

    #[test]
    fn cancelled_jobs_do_not_run() {
        let exp = experiment(2);
        let pool = build_pool(2).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let runs = execute_runs(&exp, &pool, &cancel, &NoOpObserver::new(), &NullRunWriter);
        assert_eq!(runs.len(), 8);
        assert!(runs.iter().all(|r| r.outcome == Err(EvalError::Cancelled)));
    }

    #[test]
    fn expired_deadline_marks_timeouts() {
        let problem = zdt1();
        let exp = ExperimentBuilder::new("late")
            .problem(ExperimentProblem::untagged(Arc::clone(&problem)))
            .variant(AlgorithmVariant::new(random(&problem), "A", "ZDT1"))
            .repetitions(3)
            .workers(1)
            .timeout(std::time::Duration::ZERO)
            .build()
            .unwrap();
        let runs = run_all(&exp);
        assert!(runs.iter().all(|r| matches!(r.outcome, Err(EvalError::Timeout(_)))));
    }

    #[test]
    fn observer_sees_every_job() {
        let exp = experiment(3);
        let pool = build_pool(3).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let observer = ChannelObserver::new(tx);
        execute_runs(&exp, &pool, &CancellationToken::new(), &observer, &NullRunWriter);
        drop(observer);
        let updates: Vec<ProgressUpdate> = rx.iter().collect();
        assert_eq!(updates.len(), 8);
        assert_eq!(updates.iter().filter(|u| u.is_last()).count(), 1);
        let mut jobs: Vec<usize> = updates.iter().map(|u| u.job_index).collect();
        jobs.sort_unstable();
        assert_eq!(jobs, (0..8).collect::<Vec<_>>());
    }

    struct RecordingWriter {
        written: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    impl RunWriter for RecordingWriter {
        fn write_run(
            &self,
            algorithm: &str,
            _problem: &str,
            run: usize,
            _solutions: &SolutionSet,
        ) -> Result<(), EvalError> {
            self.written.lock().push((algorithm.to_string(), run));
            if self.fail {
                Err(EvalError::Io("disk full".into()))
            } else {
                Ok(())
            }
        }

        fn write_reference_front(&self, _: &ProblemReference) -> Result<(), EvalError> {
            Ok(())
        }

        fn write_indicator_table(&self, _: &IndicatorTable) -> Result<(), EvalError> {
            Ok(())
        }

        fn write_statistics(&self, _: &StatisticsReport) -> Result<(), EvalError> {
            Ok(())
        }
    }

    #[test]
    fn every_successful_run_is_written_and_write_errors_are_tolerated() {
        let exp = experiment(2);
        let pool = build_pool(2).unwrap();
        for fail in [false, true] {
            let writer = RecordingWriter {
                written: Mutex::new(Vec::new()),
                fail,
            };
            let runs = execute_runs(&exp, &pool, &CancellationToken::new(), &NoOpObserver::new(), &writer);
            assert!(runs.iter().all(Run::succeeded));
            let mut written = writer.written.into_inner();
            written.sort();
            assert_eq!(written.len(), 8);
            assert_eq!(written[0], ("A".to_string(), 0));
        }
    }
}
