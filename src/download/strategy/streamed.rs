//! Streamed download strategy: chunked write into the downloads folder.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::download::progress::AttemptProgress;
use crate::download::strategy::{cleanup_partial, DownloadStrategy, StrategyError, StrategyOutcome};
use crate::download::task::DownloadRequest;
use crate::fs::paths::APP_FOLDER;

/// Streams the resource into an app-specific subfolder of the downloads
/// directory, reporting percent progress as bytes arrive.
///
/// Progress is only reported when the server advertises a content length.
pub struct StreamedDownload {
    client: Client,
    downloads_dir: PathBuf,
}

impl StreamedDownload {
    pub fn new(client: Client, downloads_dir: PathBuf) -> Self {
        Self {
            client,
            downloads_dir,
        }
    }

    async fn stream_to_file(
        &self,
        response: Response,
        path: &Path,
        progress: &AttemptProgress,
    ) -> Result<(), StrategyError> {
        let total = response.content_length().filter(|len| *len > 0);

        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            if let Some(total) = total {
                let percent = ((received * 100) / total).min(100) as u8;
                progress.update(percent).await;
            }
        }

        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl DownloadStrategy for StreamedDownload {
    fn name(&self) -> &'static str {
        "filesystem-streamed"
    }

    async fn attempt(
        &self,
        request: &DownloadRequest,
        progress: &AttemptProgress,
    ) -> Result<StrategyOutcome, StrategyError> {
        let target_dir = self.downloads_dir.join(APP_FOLDER);
        tokio::fs::create_dir_all(&target_dir).await?;

        let response = self.client.get(&request.source_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status));
        }

        let path = target_dir.join(&request.file_name);

        if let Err(e) = self.stream_to_file(response, &path, progress).await {
            cleanup_partial(&path).await;
            return Err(e);
        }

        tracing::debug!(
            url = %request.source_url,
            path = %path.display(),
            "streamed resource to downloads folder"
        );

        Ok(StrategyOutcome::Fetched(path))
    }
}
