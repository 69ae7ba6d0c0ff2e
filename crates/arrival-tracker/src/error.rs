//! Configuration errors.

use thiserror::Error;

/// Errors raised while reading tracker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value we cannot use.
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
