//! Error types for the situation map.

use alert_core::CatalogError;
use alert_feed::SourceError;
use arrival_tracker::ConfigError;
use thiserror::Error;

/// Errors that can occur while setting up or running the pipeline.
#[derive(Debug, Error)]
pub enum SituationError {
    /// Invalid tracker configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The region catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The feed could not be set up.
    #[error("feed error: {0}")]
    Source(#[from] SourceError),

    /// Writing frames failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame consumer went away.
    #[error("frame sink closed")]
    SinkClosed,

    /// Neither a live feed nor a recording was configured.
    #[error("no feed configured (set SITUATION_FEED_URL or pass --feed-url / --replay)")]
    NoFeed,
}
