//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::observer::ProgressObserver;
use crate::progress::ProgressUpdate;

/// Observer that forwards updates through a channel (non-blocking).
pub struct ChannelObserver {
    sender: Sender<ProgressUpdate>,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        // A full or disconnected channel drops the update.
        let _ = self.sender.try_send(update.clone());
    }
}

/// Observer that logs finished jobs with temporal throttling.
///
/// Failed runs and the last job are always logged.
pub struct LoggingObserver {
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl ProgressObserver for LoggingObserver {
    #[allow(clippy::cast_possible_truncation)]
    fn on_progress(&self, update: &ProgressUpdate) {
        if !update.succeeded {
            warn!(
                algorithm = %update.algorithm,
                problem = %update.problem,
                run = update.run,
                "Run failed"
            );
            return;
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms && !update.is_last() {
            return;
        }
        self.last_time.store(now, Ordering::Relaxed);

        if update.is_last() {
            info!(total = update.total, "All runs finished");
        } else {
            debug!(
                algorithm = %update.algorithm,
                problem = %update.problem,
                run = update.run,
                progress = format!("{:.1}%", update.progress() * 100.0),
                "Run finished"
            );
        }
    }
}

/// Observer that ignores every update.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all progress updates.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn update(completed: usize, succeeded: bool) -> ProgressUpdate {
        ProgressUpdate {
            job_index: completed.saturating_sub(1),
            algorithm: "random".into(),
            problem: "ZDT1".into(),
            run: 0,
            completed,
            total: 4,
            succeeded,
            duration: Duration::from_millis(2),
        }
    }

    #[test]
    fn channel_observer_sends() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&update(1, true));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.algorithm, "random");
        assert_eq!(received.completed, 1);
    }

    #[test]
    fn channel_observer_full_channel_does_not_panic() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&update(1, true));
        observer.on_progress(&update(2, true));
    }

    #[test]
    fn channel_observer_disconnected_does_not_panic() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        ChannelObserver::new(tx).on_progress(&update(1, true));
    }

    #[test]
    fn logging_observer_throttles_and_reports_failures() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&update(1, true));
        observer.on_progress(&update(2, true));
        observer.on_progress(&update(3, false));
        observer.on_progress(&update(4, true));
    }

    #[test]
    fn noop_observer_default() {
        NoOpObserver::default().on_progress(&update(1, true));
    }
}
