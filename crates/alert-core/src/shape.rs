//! Output types: merged shapes and view bounds.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::event::AlertStatus;
use crate::region::LatLng;

/// The union of same-status alert regions.
///
/// Components are rings in (lat, lng) order. Metadata is aggregated over every
/// alert that contributed to the status group, even when the shape covers only
/// one disconnected piece of that group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedShape {
    /// Stable only within one computation pass.
    pub id: String,
    pub status: AlertStatus,
    pub components: Vec<Vec<LatLng>>,
    pub source_region_keys: IndexSet<String>,
    pub source_alert_ids: IndexSet<String>,
    pub is_double: bool,
    pub latest_timestamp: i64,
}

impl MergedShape {
    /// Whether any contributing alert has one of the given ids.
    pub fn touches_any<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> bool {
        ids.into_iter().any(|id| self.source_alert_ids.contains(id))
    }

    /// All points of all components.
    pub fn points(&self) -> impl Iterator<Item = &LatLng> {
        self.components.iter().flatten()
    }
}

/// Axis-aligned bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south: south_west.lat,
            west: south_west.lng,
            north: north_east.lat,
            east: north_east.lng,
        }
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    /// Whether the point lies inside or on the edge of the box.
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}
