//! Resource download orchestration.
//!
//! This module provides:
//! - The task registry enforcing one in-flight download per resource
//! - The ordered strategy set with fallback
//! - Per-task progress reporting
//! - Task state tracking

pub mod progress;
pub mod registry;
pub mod strategy;
pub mod task;

pub use progress::{AttemptProgress, NullReporter, ProgressReporter};
pub use registry::DownloadRegistry;
pub use strategy::{
    DirectFetch, DownloadStrategy, ExternalHandler, StrategyError, StrategyOutcome,
    StreamedDownload,
};
pub use task::{DownloadRequest, DownloadTask, TaskState};
