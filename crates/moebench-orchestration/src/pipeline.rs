//! End-to-end experiment execution: runs, reference fronts, indicators and
//! statistics, each stage a barrier for the next.

use tracing::{info, warn};

use moebench_core::error::EvalError;
use moebench_core::experiment::Experiment;
use moebench_core::observer::ProgressObserver;
use moebench_core::progress::CancellationToken;
use moebench_core::table::IndicatorTable;

use crate::comparison::{compare, StatisticsReport};
use crate::interfaces::{Run, RunWriter};
use crate::quality::compute_indicators;
use crate::reference_front::{build_reference_fronts, ProblemReference};
use crate::scheduler::{build_pool, execute_runs};

/// Everything an experiment produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub runs: Vec<Run>,
    pub references: Vec<ProblemReference>,
    pub table: IndicatorTable,
    pub statistics: StatisticsReport,
}

impl ExperimentOutcome {
    pub fn failed_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| !r.succeeded())
    }

    /// Whether any run was skipped because of user cancellation.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.failed_runs()
            .any(|r| matches!(r.outcome, Err(EvalError::Cancelled)))
    }

    /// Whether any run was skipped because the deadline passed.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.failed_runs()
            .any(|r| matches!(r.outcome, Err(EvalError::Timeout(_))))
    }

    /// Whether the table holds one cell per (indicator, problem, variant,
    /// repetition).
    #[must_use]
    pub fn is_complete(&self, experiment: &Experiment) -> bool {
        experiment.indicators().iter().all(|&kind| {
            experiment.problems().iter().all(|p| {
                self.table.count(kind, p.tag())
                    == experiment.variants_for(p.tag()).count() * experiment.repetitions()
            })
        })
    }
}

/// Run `experiment` end to end on its own worker pool.
///
/// Failed runs are recorded and excluded from later stages; writer errors
/// are logged and never abort the pipeline.
pub fn run_experiment(
    experiment: &Experiment,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
    writer: &dyn RunWriter,
) -> Result<ExperimentOutcome, EvalError> {
    let pool = build_pool(experiment.workers())?;

    let runs = execute_runs(experiment, &pool, cancel, observer, writer);

    let references = build_reference_fronts(experiment, &runs)?;
    for reference in &references {
        if let Err(e) = writer.write_reference_front(reference) {
            warn!(problem = %reference.problem, error = %e, "failed to write reference front");
        }
    }

    let table = pool.install(|| compute_indicators(experiment, &runs, &references))?;
    if let Err(e) = writer.write_indicator_table(&table) {
        warn!(error = %e, "failed to write indicator table");
    }

    let statistics = compare(experiment, &table);
    if let Err(e) = writer.write_statistics(&statistics) {
        warn!(error = %e, "failed to write statistics");
    }

    info!(experiment = experiment.name(), "experiment complete");
    Ok(ExperimentOutcome {
        runs,
        references,
        table,
        statistics,
    })
}
