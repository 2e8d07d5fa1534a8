//! Endpoint list input.
//!
//! An endpoint list is a file holding one comma-separated line of URLs.

use crate::error::PingError;
use std::path::Path;
use tracing::debug;

/// Split endpoint list content into endpoint strings.
///
/// Surrounding whitespace (including the trailing newline most editors add)
/// is trimmed from every entry. Empty entries produced by stray commas are
/// kept; they fail later as transport errors. Content that is empty or only
/// whitespace yields no endpoints at all.
pub fn parse_endpoint_list(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    content
        .split(',')
        .map(|entry| entry.trim().to_string())
        .collect()
}

/// Read and parse an endpoint list file.
///
/// # Errors
///
/// Returns `PingError::FileError` if the file is missing or unreadable.
pub async fn read_endpoint_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, PingError> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        PingError::file_error(
            path.to_string_lossy(),
            format!("Could not read endpoint list: {}", e),
        )
    })?;

    let endpoints = parse_endpoint_list(&content);
    debug!(path = %path.display(), count = endpoints.len(), "loaded endpoint list");
    Ok(endpoints)
}
