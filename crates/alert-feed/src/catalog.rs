//! Region catalog loaded from the static `polygons.json` dataset.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use alert_core::{CatalogError, InMemoryCatalog, LatLng, RegionCatalog, RegionPolygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    city_name: String,
    #[serde(default)]
    polygon: Vec<[f64; 2]>,
}

/// A [`RegionCatalog`] read from JSON.
///
/// The file is an object keyed by region key:
///
/// ```json
/// { "חיפה": { "city_name": "Haifa", "city_name_he": "חיפה", "polygon": [[32.8, 34.9], ...] } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    regions: InMemoryCatalog,
    display_names: HashMap<String, String>,
}

impl JsonCatalog {
    /// Load a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!("Loaded {} regions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    ///
    /// Entries that do not have the expected shape are skipped. Entries with
    /// an empty polygon are kept.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let entries: Map<String, Value> = serde_json::from_str(raw)?;

        let mut catalog = Self::default();
        for (key, value) in entries {
            let entry: CatalogEntry = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(region = %key, "Skipping malformed catalog entry: {}", e);
                    continue;
                }
            };

            let ring = entry.polygon.into_iter().map(LatLng::from).collect();
            if !entry.city_name.is_empty() {
                catalog
                    .display_names
                    .insert(key.clone(), entry.city_name);
            }
            catalog.regions.insert(RegionPolygon::new(key, ring));
        }

        Ok(catalog)
    }

    /// Display name of a region, if the dataset has one.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.display_names.get(key).map(String::as_str)
    }
}

impl RegionCatalog for JsonCatalog {
    fn get(&self, key: &str) -> Option<&RegionPolygon> {
        self.regions.get(key)
    }

    fn len(&self) -> usize {
        self.regions.len()
    }
}
