//! Configuration for the situation map.

use std::env;
use std::path::PathBuf;

use alert_feed::FeedConfig;
use arrival_tracker::{FitOptions, TrackerConfig};

use crate::error::SituationError;

/// Default location of the region catalog.
pub const DEFAULT_CATALOG_PATH: &str = "./data/polygons.json";

/// Everything needed to run the pipeline.
#[derive(Debug, Clone)]
pub struct SituationConfig {
    pub tracker: TrackerConfig,
    pub fit: FitOptions,
    /// Live feed, if one is configured.
    pub feed: Option<FeedConfig>,
    pub catalog_path: PathBuf,
}

impl Default for SituationConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            fit: FitOptions::default(),
            feed: None,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl SituationConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SITUATION_CATALOG_PATH` (default: ./data/polygons.json)
    /// - `SITUATION_FEED_URL` (no live feed when unset)
    /// - everything read by [`TrackerConfig::from_env`],
    ///   [`FitOptions::from_env`] and [`FeedConfig::from_env`]
    pub fn from_env() -> Result<Self, SituationError> {
        let catalog_path = env::var("SITUATION_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH));

        let feed = if env::var("SITUATION_FEED_URL").is_ok() {
            Some(FeedConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            tracker: TrackerConfig::from_env()?,
            fit: FitOptions::from_env(),
            feed,
            catalog_path,
        })
    }
}
