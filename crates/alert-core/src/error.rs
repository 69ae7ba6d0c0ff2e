//! Error types for the collaborator interfaces.

use thiserror::Error;

/// Errors produced by an [`AlertFeed`](crate::AlertFeed).
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure (connection dropped, HTTP error).
    #[error("transport error: {0}")]
    Transport(String),

    /// The payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server cancelled the subscription.
    #[error("subscription cancelled: {0}")]
    Cancelled(String),

    /// Reconnection attempts are exhausted.
    #[error("gave up after {0} reconnect attempts")]
    RetriesExhausted(u32),
}

/// Errors produced while loading a region catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
