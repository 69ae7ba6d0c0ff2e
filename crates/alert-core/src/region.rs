//! Region geometry and the catalog that maps region keys to it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point in (lat, lng) order, serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lng]
    }
}

/// The outline of one region.
///
/// The ring is implicitly closed; it may or may not repeat the first point
/// at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPolygon {
    pub region_key: String,
    pub ring: Vec<LatLng>,
}

impl RegionPolygon {
    pub fn new(region_key: impl Into<String>, ring: Vec<LatLng>) -> Self {
        Self {
            region_key: region_key.into(),
            ring,
        }
    }
}

/// Read-only lookup from region key to polygon.
///
/// Loaded once per session. Lookups for unknown keys return `None`; callers
/// skip those regions.
pub trait RegionCatalog: Send + Sync {
    /// Look up the polygon for a region key.
    fn get(&self, region_key: &str) -> Option<&RegionPolygon>;

    /// Number of regions in the catalog.
    fn len(&self) -> usize;

    /// Whether the catalog holds no regions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    regions: HashMap<String, RegionPolygon>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from polygons, keyed by their region key.
    ///
    /// A later polygon with the same key replaces an earlier one.
    pub fn from_regions(regions: impl IntoIterator<Item = RegionPolygon>) -> Self {
        let regions = regions
            .into_iter()
            .map(|region| (region.region_key.clone(), region))
            .collect();
        Self { regions }
    }

    /// Insert or replace a region.
    pub fn insert(&mut self, region: RegionPolygon) {
        self.regions.insert(region.region_key.clone(), region);
    }
}

impl RegionCatalog for InMemoryCatalog {
    fn get(&self, region_key: &str) -> Option<&RegionPolygon> {
        self.regions.get(region_key)
    }

    fn len(&self) -> usize {
        self.regions.len()
    }
}
