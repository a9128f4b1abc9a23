//! External handler strategy: delegate the URL to the operating system.

use std::sync::Arc;

use async_trait::async_trait;

use crate::download::progress::AttemptProgress;
use crate::download::strategy::{DownloadStrategy, StrategyError, StrategyOutcome};
use crate::download::task::DownloadRequest;
use crate::platform::opener::UrlOpener;

/// Hands the resource URL to whatever external application can open it.
///
/// Best-effort terminal fallback: the attempt succeeds as soon as the handoff
/// is accepted, and the download is no longer observable or cancelable after
/// that.
pub struct ExternalHandler {
    opener: Arc<dyn UrlOpener>,
}

impl ExternalHandler {
    pub fn new(opener: Arc<dyn UrlOpener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl DownloadStrategy for ExternalHandler {
    fn name(&self) -> &'static str {
        "external-handler"
    }

    async fn attempt(
        &self,
        request: &DownloadRequest,
        _progress: &AttemptProgress,
    ) -> Result<StrategyOutcome, StrategyError> {
        self.opener
            .open(&request.source_url)
            .map_err(|e| StrategyError::Handoff(e.to_string()))?;

        tracing::info!(
            url = %request.source_url,
            "handed download to the system URL handler"
        );

        Ok(StrategyOutcome::Delegated)
    }
}
