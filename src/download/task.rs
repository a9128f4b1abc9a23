//! Download task state.

use crate::error::Result;
use crate::fs::{file_name_from_url, mime_for_filename, sanitize_filename};

/// Lifecycle states of a download task.
///
/// Transitions are monotonic: `Idle → PermissionPending → Downloading →
/// Delivering → Completed`, with `Failed` reachable from `PermissionPending`,
/// `Downloading`, and `Delivering`. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    PermissionPending,
    Downloading,
    Delivering,
    Completed,
    Failed,
}

impl TaskState {
    /// Whether no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// Immutable description of what a strategy should fetch.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub id: String,
    pub source_url: String,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// One tracked download, keyed by resource id in the registry.
#[derive(Debug)]
pub struct DownloadTask {
    pub id: String,
    pub source_url: String,
    pub file_name: String,
    pub mime_type: &'static str,
    pub state: TaskState,
    /// Index of the active strategy; only ever increases.
    pub strategy_index: usize,
    /// Percent complete of the current strategy attempt, 0-100.
    pub progress_percent: u8,
    /// Most recent failure reason, kept for diagnostics even after a later
    /// strategy succeeds.
    pub last_error: Option<String>,
}

impl DownloadTask {
    /// Create a task for a resource.
    ///
    /// The file name comes from the caller when supplied, otherwise from the
    /// URL's final path segment; either way it is sanitized before use.
    pub fn new(id: &str, source_url: &str, suggested_name: Option<&str>) -> Result<Self> {
        let file_name = match suggested_name {
            Some(name) => sanitize_filename(name)?,
            None => file_name_from_url(source_url)?,
        };
        let mime_type = mime_for_filename(&file_name);

        Ok(Self {
            id: id.to_string(),
            source_url: source_url.to_string(),
            file_name,
            mime_type,
            state: TaskState::Idle,
            strategy_index: 0,
            progress_percent: 0,
            last_error: None,
        })
    }

    /// Snapshot of the fetch parameters handed to strategies.
    pub fn request(&self) -> DownloadRequest {
        DownloadRequest {
            id: self.id.clone(),
            source_url: self.source_url.clone(),
            file_name: self.file_name.clone(),
            mime_type: self.mime_type,
        }
    }

    /// Enter the permission resolution phase.
    pub fn begin_permission(&mut self) {
        self.state = TaskState::PermissionPending;
    }

    /// Enter `Downloading` for the strategy at `index`, resetting progress.
    ///
    /// Returns whether the previous attempt had reported any progress, so the
    /// caller knows to emit a reset event to observers.
    pub fn begin_attempt(&mut self, index: usize) -> bool {
        let had_progress = self.progress_percent > 0;
        self.strategy_index = index;
        self.progress_percent = 0;
        self.state = TaskState::Downloading;
        had_progress
    }

    /// Record percent progress within the current attempt.
    ///
    /// Returns `true` when the value advanced; stale or repeated values are
    /// ignored to keep the reported sequence non-decreasing.
    pub fn record_progress(&mut self, percent: u8) -> bool {
        let percent = percent.min(100);
        if percent > self.progress_percent {
            self.progress_percent = percent;
            true
        } else {
            false
        }
    }

    /// Retain a strategy failure reason for diagnostics.
    pub fn record_strategy_error(&mut self, reason: String) {
        self.last_error = Some(reason);
    }

    /// Mark the strategy set as exhausted.
    pub fn exhaust(&mut self, strategy_count: usize) {
        self.strategy_index = strategy_count;
    }

    /// Enter the delivery phase.
    pub fn begin_delivery(&mut self) {
        self.state = TaskState::Delivering;
    }

    /// Terminal success.
    pub fn complete(&mut self) {
        self.state = TaskState::Completed;
    }

    /// Terminal failure.
    pub fn fail(&mut self, reason: String) {
        self.last_error = Some(reason);
        self.state = TaskState::Failed;
    }
}
