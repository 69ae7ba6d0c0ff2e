//! Core types and collaborator traits for the situation map.
//!
//! This crate provides the shared vocabulary for every other crate in the
//! workspace. It defines:
//!
//! - [`AlertEvent`] / [`AlertStatus`] - One alerted region as delivered by the feed
//! - [`RegionPolygon`] / [`RegionCatalog`] - The static region geometry lookup
//! - [`AlertFeed`] - The push-based source of whole-collection snapshots
//! - [`MergedShape`] / [`BoundingBox`] - What the merge engine and fit planner emit
//! - [`ShapeStyle`] / [`AlertSummary`] - Renderer hints derived from a snapshot
//!
//! # Example
//!
//! ```rust
//! use alert_core::{AlertEvent, AlertStatus, InMemoryCatalog, LatLng, RegionCatalog, RegionPolygon};
//!
//! let catalog = InMemoryCatalog::from_regions(vec![RegionPolygon::new(
//!     "haifa",
//!     vec![
//!         LatLng::new(32.80, 34.98),
//!         LatLng::new(32.80, 35.02),
//!         LatLng::new(32.84, 35.02),
//!     ],
//! )]);
//!
//! let alert = AlertEvent::new("a1", "haifa", AlertStatus::Active, 1_700_000_000_000);
//! assert!(catalog.get(&alert.region_key).is_some());
//! ```

mod error;
mod event;
mod feed;
mod region;
mod shape;
mod style;
mod summary;

pub use error::{CatalogError, FeedError};
pub use event::{AlertEvent, AlertStatus, Snapshot};
pub use feed::{AlertFeed, SnapshotStream};
pub use region::{InMemoryCatalog, LatLng, RegionCatalog, RegionPolygon};
pub use shape::{BoundingBox, MergedShape};
pub use style::ShapeStyle;
pub use summary::AlertSummary;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
