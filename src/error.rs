//! Error types for wordshard
//!
//! This module defines the error hierarchy covering:
//! - Shard connection and SQLite statement errors
//! - Configuration and CLI errors
//! - Indexing-run errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the shard or path involved
//! - Preserve error chains for debugging

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the wordshard application
#[derive(Error, Debug)]
pub enum IndexError {
    /// Shard storage errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (file reads during indexing, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interrupted by signal
    #[error("Operation interrupted by signal")]
    Interrupted,
}

/// Shard storage errors
///
/// A `ConnectionFailed` means the shard's backing database could not be
/// opened at all; it is fatal to the calling operation and never retried.
/// A `Sqlite` error is a statement failure - the enclosing transaction has
/// already been rolled back when it surfaces.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open a shard's backing database
    #[error("Failed to open shard '{shard}' at '{path}': {source}")]
    ConnectionFailed {
        shard: &'static str,
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// SQLite statement failure (constraint violation, malformed write)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root directory to index does not exist or is not a directory
    #[error("Invalid corpus root '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Shard data directory problem
    #[error("Invalid shard directory '{path}': {reason}")]
    InvalidDataDir { path: PathBuf, reason: String },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// No file extensions left after normalization
    #[error("At least one file extension is required")]
    NoExtensions,

    /// Invalid result limit
    #[error("Invalid result limit {limit}: must be at least 1")]
    InvalidLimit { limit: usize },
}

/// HTTP facade errors
#[cfg(feature = "server")]
#[derive(Error, Debug)]
pub enum ServerError {
    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Invalid query/body parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// I/O error (bind, serve)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let (status, message) = match &self {
            ServerError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for ServerError
#[cfg(feature = "server")]
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Result type alias for IndexError
pub type Result<T> = std::result::Result<T, IndexError>;

/// Result type alias for StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_conversion() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let store_err: StoreError = sqlite_err.into();
        let index_err: IndexError = store_err.into();
        assert!(matches!(index_err, IndexError::Store(_)));
    }

    #[test]
    fn test_connection_failed_display() {
        let err = StoreError::ConnectionFailed {
            shard: "document-store",
            path: PathBuf::from("/data/document-store.db"),
            source: rusqlite::Error::InvalidQuery,
        };
        let msg = err.to_string();
        assert!(msg.contains("document-store"));
        assert!(msg.contains("document-store.db"));
    }
}
