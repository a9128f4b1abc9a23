//! Path and directory management.

use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};

use crate::error::{Error, Result};

/// Subfolder created under the downloads directory for streamed files.
pub const APP_FOLDER: &str = "ResourceLibrary";

/// Transient cache directory for direct fetches.
///
/// Artifacts placed here are handed to the delivery sink and are not
/// expected to outlive the process.
pub fn app_cache_dir() -> Result<PathBuf> {
    if let Some(dirs) = ProjectDirs::from("", "", "resource-downloader") {
        return Ok(dirs.cache_dir().to_path_buf());
    }
    // Headless environments may have no home directory
    Ok(std::env::temp_dir().join("resource-downloader"))
}

/// Default save directory: the user's downloads folder.
pub fn default_save_dir() -> Result<PathBuf> {
    let user_dirs = UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine user directories".to_string()))?;

    user_dirs
        .download_dir()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| Error::Config("Could not determine downloads directory".to_string()))
}
