//! A feed fed by hand through a tokio channel.

use std::sync::Mutex;

use alert_core::{AlertFeed, FeedError, Snapshot, SnapshotStream};
use futures::stream;
use tokio::sync::mpsc;
use tracing::warn;

/// Sending half of a [`ChannelFeed`].
pub type SnapshotSender = mpsc::Sender<Result<Snapshot, FeedError>>;

/// An [`AlertFeed`] over an mpsc receiver.
///
/// The receiver can be consumed once; later subscriptions get an empty stream.
#[derive(Debug)]
pub struct ChannelFeed {
    receiver: Mutex<Option<mpsc::Receiver<Result<Snapshot, FeedError>>>>,
}

impl ChannelFeed {
    /// Create a feed and its sender.
    pub fn new(buffer: usize) -> (SnapshotSender, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::from_receiver(rx))
    }

    pub fn from_receiver(receiver: mpsc::Receiver<Result<Snapshot, FeedError>>) -> Self {
        Self {
            receiver: Mutex::new(Some(receiver)),
        }
    }
}

impl AlertFeed for ChannelFeed {
    fn subscribe(&self) -> SnapshotStream {
        let receiver = match self.receiver.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match receiver {
            Some(rx) => Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })),
            None => {
                warn!("Channel feed already subscribed");
                Box::pin(stream::empty())
            }
        }
    }

    fn name(&self) -> &str {
        "channel"
    }
}
