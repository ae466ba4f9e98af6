//! Input checks shared by every backend.
//!
//! Runs before any OS call so all platforms agree on what counts as
//! malformed input (empty path, unparseable URL, bogus identifier).

use crate::error::{AppServicesError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Longest bundle identifier we accept; matches the CFBundleIdentifier limit.
pub const MAX_BUNDLE_IDENTIFIER_LEN: usize = 255;

/// Checks that `path` is non-empty and exists, returning it as a `PathBuf`.
pub fn validate_file_path(path: &str) -> Result<PathBuf> {
    if path.trim().is_empty() {
        return Err(AppServicesError::InvalidArgument(
            "file path cannot be empty".to_string(),
        ));
    }
    let path = Path::new(path);
    if !path.exists() {
        return Err(AppServicesError::FileNotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Parses `raw` as an absolute URL. Relative references and free text fail.
pub fn validate_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| AppServicesError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid("url cannot be empty".to_string()));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(invalid("url cannot contain whitespace".to_string()));
    }
    Url::parse(raw).map_err(|e| invalid(e.to_string()))
}

/// Rejects identifiers that can never name an installed application.
pub fn validate_bundle_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(AppServicesError::InvalidArgument(
            "bundle identifier cannot be empty".to_string(),
        ));
    }
    if identifier.len() > MAX_BUNDLE_IDENTIFIER_LEN {
        return Err(AppServicesError::InvalidArgument(format!(
            "bundle identifier longer than {} bytes",
            MAX_BUNDLE_IDENTIFIER_LEN
        )));
    }
    if identifier
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\0')
    {
        return Err(AppServicesError::InvalidArgument(format!(
            "bundle identifier contains invalid characters: {:?}",
            identifier
        )));
    }
    Ok(())
}
