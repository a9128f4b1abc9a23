//! Direct fetch strategy: whole body into a transient cache location.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;

use crate::download::progress::AttemptProgress;
use crate::download::strategy::{cleanup_partial, DownloadStrategy, StrategyError, StrategyOutcome};
use crate::download::task::DownloadRequest;

/// Fetches the full resource body in one request and writes it to a cache
/// directory, leaving final placement to the delivery sink.
///
/// No byte-level progress is reported; the body arrives in a single buffered
/// read.
pub struct DirectFetch {
    client: Client,
    cache_dir: PathBuf,
}

impl DirectFetch {
    pub fn new(client: Client, cache_dir: PathBuf) -> Self {
        Self { client, cache_dir }
    }
}

#[async_trait]
impl DownloadStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct-fetch"
    }

    async fn attempt(
        &self,
        request: &DownloadRequest,
        _progress: &AttemptProgress,
    ) -> Result<StrategyOutcome, StrategyError> {
        let response = self.client.get(&request.source_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status));
        }

        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.cache_dir.join(&request.file_name);

        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            cleanup_partial(&path).await;
            return Err(StrategyError::Filesystem(e));
        }

        tracing::debug!(
            url = %request.source_url,
            path = %path.display(),
            "fetched resource into cache"
        );

        Ok(StrategyOutcome::Fetched(path))
    }
}
