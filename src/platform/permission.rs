//! Storage permission gate.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The process may write to durable storage.
    Granted,
    /// Not currently held, but a `request()` may succeed.
    Denied,
    /// Permanently suppressed; the user must change system settings.
    /// Callers must not re-prompt.
    Blocked,
}

/// Resolves whether the process may write to the storage location the first
/// download strategy will use.
///
/// Implementations encapsulate platform-specific branching so callers only
/// see the three-valued outcome.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Query the current grant without prompting.
    async fn check(&self) -> PermissionStatus;

    /// Actively request the grant. Never returns `Blocked`; callers must not
    /// invoke this after `check()` returned `Blocked`.
    async fn request(&self) -> PermissionStatus;
}

/// Permission gate backed by write access to the save directory.
///
/// A missing directory counts as `Denied` because `request()` can create it;
/// an existing directory the process cannot write into is `Blocked`, since
/// only action outside the process can change that.
pub struct StoragePermissions {
    save_dir: PathBuf,
}

impl StoragePermissions {
    pub fn new(save_dir: PathBuf) -> Self {
        Self { save_dir }
    }

    async fn probe_write(dir: &Path) -> io::Result<()> {
        let marker = dir.join(".write_probe");
        tokio::fs::write(&marker, b"").await?;
        let _ = tokio::fs::remove_file(&marker).await;
        Ok(())
    }
}

#[async_trait]
impl PermissionGate for StoragePermissions {
    async fn check(&self) -> PermissionStatus {
        if !self.save_dir.exists() {
            return PermissionStatus::Denied;
        }

        match Self::probe_write(&self.save_dir).await {
            Ok(()) => PermissionStatus::Granted,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => PermissionStatus::Blocked,
            Err(_) => PermissionStatus::Denied,
        }
    }

    async fn request(&self) -> PermissionStatus {
        if tokio::fs::create_dir_all(&self.save_dir).await.is_err() {
            return PermissionStatus::Denied;
        }

        match Self::probe_write(&self.save_dir).await {
            Ok(()) => PermissionStatus::Granted,
            Err(_) => PermissionStatus::Denied,
        }
    }
}
