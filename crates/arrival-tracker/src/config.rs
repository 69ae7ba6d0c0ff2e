//! Configuration for the tracker and the fit planner.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;

/// How long a newly active alert stays highlighted.
pub const DEFAULT_HIGHLIGHT_WINDOW: Duration = Duration::from_millis(5000);

/// How highlight expiry timers interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryMode {
    /// A single pending timer. Scheduling a new batch cancels the previous
    /// batch's timer, so that batch stays highlighted until a reset.
    #[default]
    Coalesced,
    /// Every batch expires on its own timer.
    PerBatch,
}

impl FromStr for ExpiryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coalesced" => Ok(ExpiryMode::Coalesced),
            "per_batch" | "per-batch" => Ok(ExpiryMode::PerBatch),
            other => Err(other.to_string()),
        }
    }
}

/// Configuration for [`NewArrivalTracker`](crate::NewArrivalTracker).
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Highlight duration for a batch of new arrivals.
    pub highlight_window: Duration,
    pub expiry_mode: ExpiryMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            highlight_window: DEFAULT_HIGHLIGHT_WINDOW,
            expiry_mode: ExpiryMode::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SITUATION_HIGHLIGHT_MS` (default: 5000)
    /// - `SITUATION_EXPIRY_MODE` (`coalesced` or `per_batch`, default: coalesced)
    pub fn from_env() -> Result<Self, ConfigError> {
        let highlight_window = env::var("SITUATION_HIGHLIGHT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_HIGHLIGHT_WINDOW);

        let expiry_mode = match env::var("SITUATION_EXPIRY_MODE") {
            Ok(raw) => raw.parse().map_err(|value| ConfigError::Invalid {
                key: "SITUATION_EXPIRY_MODE",
                value,
            })?,
            Err(_) => ExpiryMode::default(),
        };

        Ok(Self {
            highlight_window,
            expiry_mode,
        })
    }
}

/// Presentation parameters for the renderer's fit animation.
///
/// These never influence the bounds themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitOptions {
    pub padding_px: u32,
    pub max_zoom: u8,
    pub animate: bool,
    pub duration_ms: u64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 50,
            max_zoom: 12,
            animate: true,
            duration_ms: 800,
        }
    }
}

impl FitOptions {
    /// Load fit options from environment variables.
    ///
    /// Optional env vars:
    /// - `SITUATION_FIT_PADDING` (default: 50)
    /// - `SITUATION_FIT_MAX_ZOOM` (default: 12)
    /// - `SITUATION_FIT_DURATION_MS` (default: 800, 0 disables animation)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let padding_px = env::var("SITUATION_FIT_PADDING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.padding_px);
        let max_zoom = env::var("SITUATION_FIT_MAX_ZOOM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_zoom);
        let duration_ms = env::var("SITUATION_FIT_DURATION_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.duration_ms);

        Self {
            padding_px,
            max_zoom,
            animate: duration_ms > 0,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.highlight_window, Duration::from_millis(5000));
        assert_eq!(config.expiry_mode, ExpiryMode::Coalesced);

        let fit = FitOptions::default();
        assert_eq!(fit.padding_px, 50);
        assert_eq!(fit.max_zoom, 12);
        assert!(fit.animate);
    }

    #[test]
    fn test_expiry_mode_parse() {
        assert_eq!("per_batch".parse::<ExpiryMode>(), Ok(ExpiryMode::PerBatch));
        assert_eq!("Coalesced".parse::<ExpiryMode>(), Ok(ExpiryMode::Coalesced));
        assert!("sometimes".parse::<ExpiryMode>().is_err());
    }

    // Environment-based tests are combined into a single test to avoid
    // races between tests that touch process-global env vars.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            env::remove_var("SITUATION_HIGHLIGHT_MS");
            env::remove_var("SITUATION_EXPIRY_MODE");
            env::remove_var("SITUATION_FIT_PADDING");
            env::remove_var("SITUATION_FIT_MAX_ZOOM");
            env::remove_var("SITUATION_FIT_DURATION_MS");
        }

        clear_vars();
        let config = TrackerConfig::from_env().unwrap();
        assert_eq!(config.highlight_window, DEFAULT_HIGHLIGHT_WINDOW);
        assert_eq!(FitOptions::from_env(), FitOptions::default());

        env::set_var("SITUATION_HIGHLIGHT_MS", "1500");
        env::set_var("SITUATION_EXPIRY_MODE", "per_batch");
        env::set_var("SITUATION_FIT_PADDING", "20");
        env::set_var("SITUATION_FIT_DURATION_MS", "0");
        let config = TrackerConfig::from_env().unwrap();
        assert_eq!(config.highlight_window, Duration::from_millis(1500));
        assert_eq!(config.expiry_mode, ExpiryMode::PerBatch);
        let fit = FitOptions::from_env();
        assert_eq!(fit.padding_px, 20);
        assert!(!fit.animate);

        env::set_var("SITUATION_EXPIRY_MODE", "never");
        let err = TrackerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("SITUATION_EXPIRY_MODE"));

        clear_vars();
    }
}
