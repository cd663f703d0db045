//! Orchestration interfaces.

use std::time::Duration;

use moebench_core::error::EvalError;
use moebench_core::progress::ProgressUpdate;
use moebench_core::solution::SolutionSet;
use moebench_core::table::IndicatorTable;

use crate::comparison::StatisticsReport;
use crate::reference_front::ProblemReference;

/// Trait for reporting progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update.
    fn report(&self, update: &ProgressUpdate);

    /// Report completion.
    fn complete(&self);
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the outcome of every run.
    fn present_runs(&self, runs: &[Run]);

    /// Present summaries and significance tests.
    fn present_statistics(&self, report: &StatisticsReport);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Persistence collaborator for experiment artifacts.
///
/// Errors are reported to the caller, which logs them; they never fail a run.
pub trait RunWriter: Send + Sync {
    /// Store the solution set of one successful run.
    fn write_run(
        &self,
        algorithm: &str,
        problem: &str,
        run: usize,
        solutions: &SolutionSet,
    ) -> Result<(), EvalError>;

    /// Store the reference front and set of one problem.
    fn write_reference_front(&self, reference: &ProblemReference) -> Result<(), EvalError>;

    /// Store the indicator table.
    fn write_indicator_table(&self, table: &IndicatorTable) -> Result<(), EvalError>;

    /// Store the statistics report.
    fn write_statistics(&self, report: &StatisticsReport) -> Result<(), EvalError>;
}

/// One (variant, repetition) execution.
#[derive(Debug, Clone)]
pub struct Run {
    /// Index of the variant in the experiment.
    pub variant_index: usize,
    /// Algorithm tag.
    pub algorithm: String,
    /// Problem tag.
    pub problem: String,
    /// Repetition index.
    pub run: usize,
    /// Seed handed to the algorithm.
    pub seed: u64,
    /// The solution set or a structured error.
    pub outcome: Result<SolutionSet, EvalError>,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl Run {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The solution set of a successful run.
    #[must_use]
    pub fn solutions(&self) -> Option<&SolutionSet> {
        self.outcome.as_ref().ok()
    }
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn report(&self, _update: &ProgressUpdate) {}
    fn complete(&self) {}
}

/// Writer that discards everything.
pub struct NullRunWriter;

impl RunWriter for NullRunWriter {
    fn write_run(&self, _: &str, _: &str, _: usize, _: &SolutionSet) -> Result<(), EvalError> {
        Ok(())
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
