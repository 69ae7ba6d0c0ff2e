//! Configuration types for alert-feed.

use std::env;
use std::time::Duration;

use reqwest_eventsource::retry::ExponentialBackoff;

use crate::error::SourceError;

/// Realtime-database path holding the active alerts.
pub const ACTIVE_ALERTS_PATH: &str = "public_state/active_alerts";

/// Reconnect behaviour of the SSE feed.
///
/// The delays drive the event source's [`ExponentialBackoff`] policy: the
/// first reconnect waits `initial_delay`, each further consecutive failure
/// multiplies the wait by `factor` up to `max_delay`. A `retry:` field sent by
/// the server replaces `initial_delay` for that connection. Failures are
/// counted by the feed stream, which gives up once `max_retries` is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// Consecutive failures tolerated before the stream ends. `None` retries forever.
    pub max_retries: Option<u32>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            factor: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Read `SITUATION_FEED_MAX_RETRIES`, `SITUATION_FEED_RETRY_MS` and
    /// `SITUATION_FEED_RETRY_MAX_MS`, keeping defaults for unset or invalid values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let millis = |name: &str| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
        };

        Self {
            max_retries: env::var("SITUATION_FEED_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok()),
            initial_delay: millis("SITUATION_FEED_RETRY_MS").unwrap_or(defaults.initial_delay),
            max_delay: millis("SITUATION_FEED_RETRY_MAX_MS").unwrap_or(defaults.max_delay),
            factor: defaults.factor,
        }
    }

    /// Retry policy for the event source. It never gives up on its own.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.initial_delay, self.factor, Some(self.max_delay), None)
    }

    /// Wait before reconnecting after `failures` consecutive failures (1-based),
    /// assuming the server did not override the initial delay.
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.factor.powi(exponent);
        if secs.is_finite() && secs >= 0.0 && secs < self.max_delay.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            self.max_delay
        }
    }

    /// Whether the stream should stop after `failures` consecutive failures.
    pub fn gives_up_after(&self, failures: u32) -> bool {
        self.max_retries.is_some_and(|max| failures >= max)
    }
}

/// Configuration for the SSE alert feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Streaming endpoint returning the keyed alert object.
    pub url: String,
    pub reconnect: ReconnectConfig,
}

impl FeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Point at the active alerts of a realtime database
    /// (e.g., "https://example.firebaseio.com").
    pub fn for_database(database_url: &str) -> Self {
        Self::new(format!(
            "{}/{}.json",
            database_url.trim_end_matches('/'),
            ACTIVE_ALERTS_PATH
        ))
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SITUATION_FEED_URL`
    ///
    /// Optional env vars are those of [`ReconnectConfig::from_env`].
    pub fn from_env() -> Result<Self, SourceError> {
        let url = env::var("SITUATION_FEED_URL")
            .map_err(|_| SourceError::Config("SITUATION_FEED_URL not set".to_string()))?;

        Ok(Self {
            url,
            reconnect: ReconnectConfig::from_env(),
        })
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }
}
