//! Terminal progress bar over finished jobs.

use indicatif::{ProgressBar, ProgressStyle};

use moebench_core::progress::ProgressUpdate;
use moebench_orchestration::interfaces::ProgressReporter;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs (eta {eta}) {msg}";

/// Progress reporter drawing an indicatif bar on stderr.
///
/// The bar is hidden in quiet mode; updates are still counted.
pub struct CLIProgressReporter {
    bar: ProgressBar,
    quiet: bool,
}

impl CLIProgressReporter {
    /// Reporter for an experiment of `total` jobs.
    #[must_use]
    pub fn new(total: usize, quiet: bool) -> Self {
        let len = u64::try_from(total).unwrap_or(u64::MAX);
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(len)
        };
        bar.set_length(len);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar, quiet }
    }

    /// Jobs reported so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn report(&self, update: &ProgressUpdate) {
        self.bar.inc(1);
        let status = if update.succeeded { "" } else { " failed" };
        self.bar.set_message(format!(
            "{} on {} run {}{status}",
            update.algorithm, update.problem, update.run
        ));
    }

    fn complete(&self) {
        if self.quiet {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish_with_message("done");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn update(completed: usize, succeeded: bool) -> ProgressUpdate {
        ProgressUpdate {
            job_index: completed - 1,
            algorithm: "random".into(),
            problem: "ZDT1".into(),
            run: completed - 1,
            completed,
            total: 3,
            succeeded,
            duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn counts_reported_jobs() {
        let reporter = CLIProgressReporter::new(3, true);
        reporter.report(&update(1, true));
        reporter.report(&update(2, false));
        assert_eq!(reporter.position(), 2);
        reporter.report(&update(3, true));
        reporter.complete();
        assert_eq!(reporter.position(), 3);
    }

    #[test]
    fn quiet_flag_is_kept() {
        assert!(CLIProgressReporter::new(1, true).is_quiet());
        assert!(!CLIProgressReporter::new(1, false).is_quiet());
    }
}
