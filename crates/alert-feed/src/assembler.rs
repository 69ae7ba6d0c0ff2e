//! Rebuilds whole snapshots from realtime-database streaming events.
//!
//! The streaming protocol sends `put` and `patch` events carrying
//! `{"path": ..., "data": ...}`. Consumers want the entire current snapshot
//! after every change, so the assembler keeps the keyed object and decodes it
//! again each time.

use alert_core::{FeedError, Snapshot};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::decode::decode_payload;

#[derive(Debug, Deserialize)]
struct StreamBody {
    path: String,
    #[serde(default)]
    data: Value,
}

/// Keeps the keyed alert object in sync with a stream of events.
#[derive(Debug, Clone, Default)]
pub struct SnapshotAssembler {
    root: Map<String, Value>,
}

impl SnapshotAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one named event.
    ///
    /// Returns the snapshot after a `put` or `patch`, `None` for events that do
    /// not change state, and an error for `cancel` and `auth_revoked`.
    pub fn apply(&mut self, event: &str, data: &str) -> Result<Option<Snapshot>, FeedError> {
        match event {
            "put" => {
                let body: StreamBody = serde_json::from_str(data)?;
                self.put(&body.path, body.data);
                self.snapshot().map(Some)
            }
            "patch" => {
                let body: StreamBody = serde_json::from_str(data)?;
                self.patch(&body.path, body.data);
                self.snapshot().map(Some)
            }
            "keep-alive" => Ok(None),
            "cancel" => Err(FeedError::Cancelled(data.trim().to_string())),
            "auth_revoked" => Err(FeedError::Cancelled("auth revoked".to_string())),
            other => {
                debug!("Ignoring stream event type: {}", other);
                Ok(None)
            }
        }
    }

    /// Replace the value at `path`. `null` removes it.
    pub fn put(&mut self, path: &str, data: Value) {
        let segments = split_path(path);
        if segments.is_empty() {
            self.root = match data {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            return;
        }
        set_at(&mut self.root, &segments, data);
    }

    /// Merge the children of `data` into the value at `path`.
    pub fn patch(&mut self, path: &str, data: Value) {
        let Value::Object(children) = data else {
            debug!("Ignoring non-object patch at {}", path);
            return;
        };

        let base = split_path(path);
        for (key, value) in children {
            let mut segments = base.clone();
            segments.extend(split_path(&key));
            if segments.is_empty() {
                continue;
            }
            set_at(&mut self.root, &segments, value);
        }
    }

    /// Decode the current state.
    pub fn snapshot(&self) -> Result<Snapshot, FeedError> {
        decode_payload(Value::Object(self.root.clone()))
    }

    /// Number of top-level records.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn clear(&mut self) {
        self.root.clear();
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn set_at(map: &mut Map<String, Value>, segments: &[&str], data: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        if data.is_null() {
            map.remove(*head);
        } else {
            map.insert(head.to_string(), data);
        }
        return;
    }

    let child = map
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    let now_empty = match child {
        Value::Object(inner) => {
            set_at(inner, rest, data);
            inner.is_empty()
        }
        _ => false,
    };
    // Empty parents disappear, like the database does.
    if now_empty {
        map.remove(*head);
    }
}
