//! Adapters for the situation map's external collaborators.
//!
//! - [`SseAlertFeed`] - live snapshots from a realtime-database SSE stream
//! - [`SnapshotAssembler`] - rebuilds whole snapshots from `put`/`patch` events
//! - [`ReplayFeed`] - recorded snapshots from a JSON-lines file
//! - [`ChannelFeed`] - snapshots pushed through a tokio channel
//! - [`JsonCatalog`] - the region catalog from `polygons.json`
//!
//! # Example
//!
//! ```rust,no_run
//! use alert_core::AlertFeed;
//! use alert_feed::{FeedConfig, SseAlertFeed};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let feed = SseAlertFeed::new(FeedConfig::for_database("https://example.firebaseio.com"))?;
//!     let mut snapshots = feed.subscribe();
//!
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("{} active alerts", snapshot?.len());
//!     }
//!     Ok(())
//! }
//! ```

mod assembler;
mod catalog;
mod channel;
mod config;
mod decode;
mod error;
mod replay;
mod sse;

pub use assembler::SnapshotAssembler;
pub use catalog::JsonCatalog;
pub use channel::{ChannelFeed, SnapshotSender};
pub use config::{FeedConfig, ReconnectConfig, ACTIVE_ALERTS_PATH};
pub use decode::{decode_payload, decode_str};
pub use error::SourceError;
pub use replay::ReplayFeed;
pub use sse::{SnapshotEventStream, SseAlertFeed};
