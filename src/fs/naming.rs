//! Filename derivation and sanitization.

use url::Url;

use crate::error::{Error, Result};

/// Fallback name when a URL has no usable final path segment.
const DEFAULT_FILE_NAME: &str = "downloaded_file";

/// Derive a file name from the final path segment of a URL.
///
/// Query strings and fragments are ignored. Returns a default name when the
/// URL path is empty or ends in a slash.
pub fn file_name_from_url(source_url: &str) -> Result<String> {
    let url = Url::parse(source_url)?;

    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);

    // The raw segment may still contain hostile characters
    sanitize_filename(name)
}

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    // Sanitize remaining problematic characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
