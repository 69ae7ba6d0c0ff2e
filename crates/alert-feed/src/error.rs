//! Error types for alert-feed.

use thiserror::Error;

/// Errors that can occur while setting up a feed source.
///
/// Errors on an already running feed are [`alert_core::FeedError`]s.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP client setup failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SSE connection could not be created.
    #[error("SSE error: {0}")]
    Sse(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
