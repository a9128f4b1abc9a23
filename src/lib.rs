//! Resource Downloader - download orchestrator for a community resource library.
//!
//! This library downloads ebook and audio assets referenced by a remote
//! resource library, with:
//!
//! - A task registry enforcing at most one in-flight download per resource
//!   while unrelated resources download concurrently
//! - Three download strategies tried strictly in order, with fallback only
//!   after failure: direct fetch, streamed-with-progress, and delegation to
//!   the system URL handler
//! - A storage permission gate resolved before any strategy runs
//! - Byte-level progress reporting through an observer channel
//! - A delivery finalizer; only its acceptance completes a task
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use resource_downloader::download::{
//!     DirectFetch, DownloadRegistry, DownloadStrategy, NullReporter,
//! };
//! use resource_downloader::platform::{SaveToFolder, StoragePermissions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = reqwest::Client::new();
//!     let save_dir = std::path::PathBuf::from("/tmp/library");
//!
//!     let strategies: Vec<Arc<dyn DownloadStrategy>> = vec![Arc::new(
//!         DirectFetch::new(client, save_dir.join("cache")),
//!     )];
//!     let registry = DownloadRegistry::new(
//!         strategies,
//!         Arc::new(StoragePermissions::new(save_dir.clone())),
//!         Arc::new(SaveToFolder::new(save_dir)),
//!         Arc::new(NullReporter),
//!     );
//!
//!     registry
//!         .start("res-1", "https://cdn.example.com/guide.pdf", None)
//!         .await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod platform;

// Re-exports for convenience
pub use api::{LibraryApi, Resource, ResourceKind};
pub use config::Config;
pub use download::{
    DownloadRegistry, DownloadStrategy, DownloadTask, ProgressReporter, TaskState,
};
pub use error::{Error, Result};
