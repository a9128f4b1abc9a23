//! Delivery finalizer: hand a materialized file to its final destination.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Failure to hand over a downloaded artifact.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("no destination available: {0}")]
    NoDestination(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The save/share sink that makes a download count as completed.
///
/// Strategy completion only materializes bytes; a task is `Completed` only
/// after the sink accepted the artifact.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Place `artifact` at its final destination under `file_name`.
    ///
    /// Returns the delivered path.
    async fn deliver(
        &self,
        artifact: &Path,
        file_name: &str,
        mime_type: &str,
    ) -> Result<PathBuf, DeliveryError>;
}

/// Sink that moves artifacts into the user's save directory.
pub struct SaveToFolder {
    save_dir: PathBuf,
}

impl SaveToFolder {
    pub fn new(save_dir: PathBuf) -> Self {
        Self { save_dir }
    }
}

#[async_trait]
impl DeliverySink for SaveToFolder {
    async fn deliver(
        &self,
        artifact: &Path,
        file_name: &str,
        mime_type: &str,
    ) -> Result<PathBuf, DeliveryError> {
        if !artifact.exists() {
            return Err(DeliveryError::NoDestination(format!(
                "artifact missing: {}",
                artifact.display()
            )));
        }

        tokio::fs::create_dir_all(&self.save_dir).await?;
        let dest = self.save_dir.join(file_name);

        if artifact == dest {
            return Ok(dest);
        }

        // Rename fails across filesystems (cache and downloads may live on
        // different mounts); fall back to copy-and-remove.
        if tokio::fs::rename(artifact, &dest).await.is_err() {
            tokio::fs::copy(artifact, &dest).await?;
            let _ = tokio::fs::remove_file(artifact).await;
        }

        tracing::debug!(
            path = %dest.display(),
            mime_type,
            "delivered file to save directory"
        );

        Ok(dest)
    }
}
