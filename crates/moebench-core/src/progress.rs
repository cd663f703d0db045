//! Job progress updates and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::EvalError;

/// Progress update emitted by the scheduler each time a job finishes.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Submission index of the finished job.
    pub job_index: usize,
    /// Tag of the algorithm variant.
    pub algorithm: String,
    /// Tag of the problem.
    pub problem: String,
    /// Repetition index of the run.
    pub run: usize,
    /// Jobs finished so far, this one included.
    pub completed: usize,
    /// Total number of jobs in the experiment.
    pub total: usize,
    /// Whether the run produced a valid solution set.
    pub succeeded: bool,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl ProgressUpdate {
    /// Fraction of jobs finished, in [0.0, 1.0].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Whether this update reports the last job of the experiment.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.completed >= self.total
    }
}

/// Cooperative cancellation token shared between the scheduler and runs.
///
/// # Example
/// ```
/// use moebench_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// Create a token without deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Derive a token that shares the cancellation flag and additionally
    /// expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Check if the deadline, if any, has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Time left before the deadline, `None` without deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Checkpoint for algorithm loops: fails when cancelled or expired.
    pub fn check_cancelled(&self) -> Result<(), EvalError> {
        if self.is_cancelled() {
            return Err(EvalError::Cancelled);
        }
        if self.is_expired() {
            return Err(EvalError::Timeout("deadline reached".to_string()));
        }
        Ok(())
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
