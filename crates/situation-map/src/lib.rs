//! Live situation map pipeline.
//!
//! Takes whole alert snapshots from an [`AlertFeed`](alert_core::AlertFeed),
//! merges same-status regions into disjoint shapes, tracks new arrivals for
//! highlighting and viewport fitting, and emits a [`RenderFrame`] per pass.
//!
//! # Example
//!
//! ```rust
//! use alert_core::{AlertEvent, AlertStatus, InMemoryCatalog, LatLng, RegionPolygon};
//! use situation_map::{SituationConfig, SituationMap};
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
//! let mut map = SituationMap::new(catalog, &SituationConfig::default());
//! let frame = map.apply(&[AlertEvent::new("1", "haifa", AlertStatus::PreAlert, 0)]);
//!
//! assert_eq!(frame.shapes.len(), 1);
//! assert!(frame.fit.is_some());
//! ```

mod config;
mod error;
mod frame;
mod pipeline;
mod processor;

pub use config::{SituationConfig, DEFAULT_CATALOG_PATH};
pub use error::SituationError;
pub use frame::{RenderFrame, RenderedShape};
pub use pipeline::SituationMap;
pub use processor::{
    FrameSink, JsonLinesSink, OutputFormat, RunSummary, SituationProcessor, StopReason,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
