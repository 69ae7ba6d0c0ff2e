//! Status grouping and polygon union for alert regions.
//!
//! Alerts are partitioned by status ([`group_by_status`]) and each group's
//! region rings are folded into a minimal set of disjoint shapes by the
//! [`PolygonUnionEngine`]. The geometry library sits behind the
//! [`GeometryUnion`] capability so it can be swapped.
//!
//! The engine is pure and never fails: a union step that cannot be resolved
//! makes the whole group fall back to one shape per alert.
//!
//! # Example
//!
//! ```rust
//! use alert_core::{AlertEvent, AlertStatus, InMemoryCatalog, LatLng, RegionPolygon};
//! use polygon_merge::PolygonUnionEngine;
//!
//! let square = |key: &str, lng: f64| {
//!     RegionPolygon::new(key, vec![
//!         LatLng::new(0.0, lng),
//!         LatLng::new(0.0, lng + 1.0),
//!         LatLng::new(1.0, lng + 1.0),
//!         LatLng::new(1.0, lng),
//!     ])
//! };
//! let catalog = InMemoryCatalog::from_regions(vec![square("a", 0.0), square("b", 0.5)]);
//!
//! let snapshot = vec![
//!     AlertEvent::new("1", "a", AlertStatus::Active, 10),
//!     AlertEvent::new("2", "b", AlertStatus::Active, 20),
//! ];
//!
//! let shapes = PolygonUnionEngine::new().merge_snapshot(&snapshot, &catalog);
//! assert_eq!(shapes.len(), 1);
//! assert_eq!(shapes[0].id, "merged_alert_0");
//! assert_eq!(shapes[0].latest_timestamp, 20);
//! ```

mod engine;
mod error;
mod grouper;
mod ring;
mod union;

pub use engine::PolygonUnionEngine;
pub use error::UnionError;
pub use grouper::{group_by_status, StatusGroups};
pub use ring::{prepare_ring, ring_self_intersects};
pub use union::{GeoBooleanUnion, GeometryUnion};
