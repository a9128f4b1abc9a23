//! Download strategies.
//!
//! Each strategy is one mechanism for getting a remote file onto the local
//! machine. The registry tries them strictly in order of preference and falls
//! back to the next one only after the current attempt has failed:
//!
//! 1. [`DirectFetch`] - full-body fetch into a transient cache location
//! 2. [`StreamedDownload`] - streamed into the downloads folder with progress
//! 3. [`ExternalHandler`] - hand the URL to the OS default handler

pub mod direct;
pub mod external;
pub mod streamed;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::download::progress::AttemptProgress;
use crate::download::task::DownloadRequest;

pub use direct::DirectFetch;
pub use external::ExternalHandler;
pub use streamed::StreamedDownload;

/// Failure of a single strategy attempt.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("handoff rejected: {0}")]
    Handoff(String),
}

/// What a successful attempt produced.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The file was materialized locally and awaits delivery.
    Fetched(PathBuf),
    /// The download was handed off to an external handler; there is nothing
    /// local to deliver and no further observability.
    Delegated,
}

/// One mechanism for retrieving and delivering a remote file.
#[async_trait]
pub trait DownloadStrategy: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Run one attempt for `request`, reporting byte progress when available.
    ///
    /// An implementation that partially wrote a file must remove it
    /// best-effort before returning the error.
    async fn attempt(
        &self,
        request: &DownloadRequest,
        progress: &AttemptProgress,
    ) -> Result<StrategyOutcome, StrategyError>;
}

/// Best-effort removal of a partially written file before fallback.
///
/// A failed removal must not block fallback to the next strategy.
pub(crate) async fn cleanup_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not remove partial download"
            );
        }
    }
}
