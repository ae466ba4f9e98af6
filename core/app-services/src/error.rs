//! Error types for app-services operations.
//! Keep AppServicesFfiError minimal and stable to avoid breaking FFI clients.
//! The C surface collapses every error to false/null; only Rust and UniFFI
//! callers see these.

use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// FFI-Compatible Error (for Swift/Kotlin/Python)
// ═══════════════════════════════════════════════════════════════════════════════

/// FFI-safe error type for use across language boundaries.
///
/// Carries just a message string so UniFFI can map it to a native exception.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum AppServicesFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<AppServicesError> for AppServicesFfiError {
    fn from(err: AppServicesError) -> Self {
        AppServicesFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur while talking to the application-services layer.
#[derive(Debug, thiserror::Error)]
pub enum AppServicesError {
    // ─────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("No application installed with identifier: {0}")]
    ApplicationNotFound(String),

    #[error("Application is not running: {0}")]
    NotRunning(String),

    #[error("Failed to launch {identifier}: {details}")]
    LaunchFailed { identifier: String, details: String },

    #[error("The system declined the request: {0}")]
    OperationRefused(String),

    // ─────────────────────────────────────────────────────────────────────
    // Platform Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Command execution failed: {command}: {details}")]
    CommandFailed { command: String, details: String },

    #[error("Platform not supported for this operation: {0}")]
    UnsupportedPlatform(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using AppServicesError.
pub type Result<T> = std::result::Result<T, AppServicesError>;
