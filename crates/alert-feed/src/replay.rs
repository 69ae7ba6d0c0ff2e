//! Replaying recorded snapshots from a JSON-lines file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use alert_core::{AlertFeed, SnapshotStream};
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::decode::decode_str;
use crate::error::SourceError;

/// An [`AlertFeed`] that yields one snapshot per recorded line.
///
/// Each non-blank line holds one payload: a keyed object, an array of events,
/// or `null`. Every subscription replays from the start.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    name: String,
    lines: Vec<String>,
    interval: Option<Duration>,
}

impl ReplayFeed {
    /// Read a recording from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let feed = Self::from_lines(raw.lines()).with_name(path.display().to_string());
        info!("Loaded {} recorded snapshots from {}", feed.len(), path.display());
        Ok(feed)
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Self {
            name: "replay".to_string(),
            lines,
            interval: None,
        }
    }

    /// Wait this long before each snapshot after the first.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl AlertFeed for ReplayFeed {
    fn subscribe(&self) -> SnapshotStream {
        let interval = self.interval;
        let lines = self.lines.clone();

        Box::pin(
            stream::iter(lines.into_iter().enumerate()).then(move |(i, line)| async move {
                if let Some(interval) = interval.filter(|_| i > 0) {
                    tokio::time::sleep(interval).await;
                }
                decode_str(&line)
            }),
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
