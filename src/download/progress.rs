//! Progress reporting contracts.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::download::task::{DownloadTask, TaskState};

/// Observer for per-task download lifecycle events.
///
/// `on_progress` values are non-decreasing within a single strategy attempt
/// and start over at 0 when the registry falls back to the next strategy.
/// Exactly one of `on_complete` or `on_failed` is emitted per started task,
/// and no event follows it. Events for different task ids are independent
/// and carry no ordering guarantee between ids.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn on_progress(&self, id: &str, percent: u8);
    async fn on_complete(&self, id: &str);
    async fn on_failed(&self, id: &str, reason: &str);
}

/// Reporter that discards all events.
pub struct NullReporter;

#[async_trait]
impl ProgressReporter for NullReporter {
    async fn on_progress(&self, _id: &str, _percent: u8) {}
    async fn on_complete(&self, _id: &str) {}
    async fn on_failed(&self, _id: &str, _reason: &str) {}
}

/// Handle given to a strategy for reporting byte-level progress of one attempt.
///
/// Routes updates through the task so the stored percentage and the observer
/// channel stay consistent.
pub struct AttemptProgress {
    id: String,
    task: Arc<Mutex<DownloadTask>>,
    reporter: Arc<dyn ProgressReporter>,
}

impl AttemptProgress {
    pub(crate) fn new(
        id: String,
        task: Arc<Mutex<DownloadTask>>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self { id, task, reporter }
    }

    /// Report percent complete for the active attempt.
    ///
    /// Stale or repeated values are dropped, and nothing is emitted once the
    /// task has left the `Downloading` state.
    pub async fn update(&self, percent: u8) {
        let percent = percent.min(100);
        let advanced = {
            let mut task = self.task.lock().await;
            if task.state != TaskState::Downloading {
                return;
            }
            task.record_progress(percent)
        };

        if advanced {
            self.reporter.on_progress(&self.id, percent).await;
        }
    }
}
