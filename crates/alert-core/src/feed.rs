//! The push-based alert feed.

use std::pin::Pin;

use futures::stream::Stream;

use crate::error::FeedError;
use crate::event::Snapshot;

/// A stream of whole-collection snapshots.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<Snapshot, FeedError>> + Send>>;

/// A source of alert snapshots.
///
/// Every item is the entire current set of active alerts, never a delta. An
/// alert missing from a later snapshot is gone. The feed owns its connection;
/// consumers only subscribe.
pub trait AlertFeed: Send + Sync {
    /// Subscribe to snapshots.
    fn subscribe(&self) -> SnapshotStream;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

impl<T: AlertFeed + ?Sized> AlertFeed for Box<T> {
    fn subscribe(&self) -> SnapshotStream {
        (**self).subscribe()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
