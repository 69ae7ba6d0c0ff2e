//! The polygon union engine.

use alert_core::{AlertEvent, AlertStatus, MergedShape, RegionCatalog};
use geo::{MultiPolygon, Polygon};
use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::grouper::group_by_status;
use crate::ring::{prepare_ring, to_lat_lng};
use crate::union::{GeoBooleanUnion, GeometryUnion};

/// One alert's region, ready for union.
struct Feature<'a> {
    alert: &'a AlertEvent,
    polygon: Polygon<f64>,
}

/// Folds same-status regions into disjoint shapes.
///
/// Pure: the same snapshot and catalog always give the same shapes. Shape ids
/// are only stable within one call.
#[derive(Debug, Clone, Default)]
pub struct PolygonUnionEngine<U = GeoBooleanUnion> {
    union: U,
}

impl PolygonUnionEngine<GeoBooleanUnion> {
    /// Create an engine backed by the `geo` boolean operations.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<U: GeometryUnion> PolygonUnionEngine<U> {
    /// Create an engine with a custom union capability.
    pub fn with_union(union: U) -> Self {
        Self { union }
    }

    /// Merge a whole snapshot, group by group in first-seen status order.
    pub fn merge_snapshot<C>(&self, snapshot: &[AlertEvent], catalog: &C) -> Vec<MergedShape>
    where
        C: RegionCatalog + ?Sized,
    {
        group_by_status(snapshot)
            .values()
            .flat_map(|group| self.merge(group, catalog))
            .collect()
    }

    /// Merge one status group.
    ///
    /// Alerts without a usable catalog ring are dropped. If any union step
    /// fails, every surviving alert is returned as its own shape instead.
    pub fn merge<C>(&self, group: &[AlertEvent], catalog: &C) -> Vec<MergedShape>
    where
        C: RegionCatalog + ?Sized,
    {
        let features = build_features(group, catalog);
        let Some((first, rest)) = features.split_first() else {
            return Vec::new();
        };
        let status = &first.alert.status;

        let mut combined = MultiPolygon::new(vec![first.polygon.clone()]);
        for feature in rest {
            let next = MultiPolygon::new(vec![feature.polygon.clone()]);
            match self.union.union(&combined, &next) {
                Ok(merged) => combined = merged,
                Err(e) => {
                    warn!(
                        status = %status,
                        region = %feature.alert.region_key,
                        "Union failed, rendering group per alert: {}",
                        e
                    );
                    return individual_shapes(&features);
                }
            }
        }

        split_components(status, &features, &combined)
    }
}

fn build_features<'a, C>(group: &'a [AlertEvent], catalog: &C) -> Vec<Feature<'a>>
where
    C: RegionCatalog + ?Sized,
{
    group
        .iter()
        .filter_map(|alert| {
            let Some(region) = catalog.get(&alert.region_key) else {
                debug!(region = %alert.region_key, "No catalog entry, skipping");
                return None;
            };
            match prepare_ring(&region.ring) {
                Some(polygon) => Some(Feature { alert, polygon }),
                None => {
                    debug!(region = %alert.region_key, "Degenerate ring, skipping");
                    None
                }
            }
        })
        .collect()
}

/// One shape per disconnected piece, all sharing the group's metadata.
fn split_components(
    status: &AlertStatus,
    features: &[Feature<'_>],
    combined: &MultiPolygon<f64>,
) -> Vec<MergedShape> {
    let source_region_keys: IndexSet<String> = features
        .iter()
        .map(|f| f.alert.region_key.clone())
        .collect();
    let source_alert_ids: IndexSet<String> =
        features.iter().map(|f| f.alert.id.clone()).collect();
    let is_double = features.iter().any(|f| f.alert.is_double);
    let latest_timestamp = features
        .iter()
        .map(|f| f.alert.timestamp)
        .max()
        .unwrap_or_default();

    combined
        .iter()
        .enumerate()
        .map(|(index, polygon)| MergedShape {
            id: format!("merged_{}_{}", status.as_str(), index),
            status: status.clone(),
            components: vec![to_lat_lng(polygon.exterior())],
            source_region_keys: source_region_keys.clone(),
            source_alert_ids: source_alert_ids.clone(),
            is_double,
            latest_timestamp,
        })
        .collect()
}

fn individual_shapes(features: &[Feature<'_>]) -> Vec<MergedShape> {
    features
        .iter()
        .map(|f| MergedShape {
            id: f.alert.id.clone(),
            status: f.alert.status.clone(),
            components: vec![to_lat_lng(f.polygon.exterior())],
            source_region_keys: IndexSet::from([f.alert.region_key.clone()]),
            source_alert_ids: IndexSet::from([f.alert.id.clone()]),
            is_double: f.alert.is_double,
            latest_timestamp: f.alert.timestamp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnionError;
    use alert_core::{InMemoryCatalog, LatLng, RegionPolygon};

    fn square(key: &str, lat: f64, lng: f64, size: f64) -> RegionPolygon {
        RegionPolygon::new(
            key,
            vec![
                LatLng::new(lat, lng),
                LatLng::new(lat, lng + size),
                LatLng::new(lat + size, lng + size),
                LatLng::new(lat + size, lng),
            ],
        )
    }

    fn active(id: &str, key: &str, ts: i64) -> AlertEvent {
        AlertEvent::new(id, key, AlertStatus::Active, ts)
    }

    struct FailingUnion;

    impl GeometryUnion for FailingUnion {
        fn union(
            &self,
            _a: &MultiPolygon<f64>,
            _b: &MultiPolygon<f64>,
        ) -> Result<MultiPolygon<f64>, UnionError> {
            Err(UnionError::Empty)
        }
    }

    #[test]
    fn test_overlapping_regions_merge_into_one_shape() {
        let catalog = InMemoryCatalog::from_regions(vec![
            square("a", 0.0, 0.0, 1.0),
            square("b", 0.5, 0.5, 1.0),
        ]);
        let group = vec![active("1", "a", 100), active("2", "b", 300).doubled()];

        let shapes = PolygonUnionEngine::new().merge(&group, &catalog);
        assert_eq!(shapes.len(), 1);

        let shape = &shapes[0];
        assert_eq!(shape.id, "merged_alert_0");
        assert_eq!(shape.components.len(), 1);
        assert!(shape.is_double);
        assert_eq!(shape.latest_timestamp, 300);
        assert_eq!(
            shape.source_region_keys.iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_disjoint_regions_split_with_shared_metadata() {
        let catalog = InMemoryCatalog::from_regions(vec![
            square("a", 0.0, 0.0, 1.0),
            square("b", 10.0, 10.0, 1.0),
        ]);
        let group = vec![active("1", "a", 5).doubled(), active("2", "b", 7)];

        let shapes = PolygonUnionEngine::new().merge(&group, &catalog);
        assert_eq!(shapes.len(), 2);

        let ids: Vec<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["merged_alert_0", "merged_alert_1"]);
        for shape in &shapes {
            assert!(shape.is_double);
            assert_eq!(shape.latest_timestamp, 7);
            assert_eq!(shape.source_region_keys.len(), 2);
            assert_eq!(shape.components.len(), 1);
        }
    }

    #[test]
    fn test_missing_and_degenerate_regions_are_skipped() {
        let catalog = InMemoryCatalog::from_regions(vec![
            square("a", 0.0, 0.0, 1.0),
            RegionPolygon::new("line", vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]),
        ]);
        let group = vec![
            active("1", "a", 1),
            active("2", "missing", 2),
            active("3", "line", 3),
        ];

        let shapes = PolygonUnionEngine::new().merge(&group, &catalog);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].latest_timestamp, 1);
        assert_eq!(
            shapes[0].source_region_keys.iter().collect::<Vec<_>>(),
            vec!["a"]
        );
    }

    #[test]
    fn test_group_without_valid_regions_yields_nothing() {
        let catalog = InMemoryCatalog::new();
        let shapes = PolygonUnionEngine::new().merge(&[active("1", "a", 1)], &catalog);
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_single_region_needs_no_union() {
        let catalog = InMemoryCatalog::from_regions(vec![square("a", 32.0, 35.0, 0.1)]);
        let shapes = PolygonUnionEngine::with_union(FailingUnion).merge(&[active("1", "a", 1)], &catalog);

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].id, "merged_alert_0");
        let ring = &shapes[0].components[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], LatLng::new(32.0, 35.0));
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_union_failure_falls_back_per_alert() {
        let catalog = InMemoryCatalog::from_regions(vec![
            square("a", 0.0, 0.0, 1.0),
            square("b", 0.5, 0.5, 1.0),
            square("c", 5.0, 5.0, 1.0),
        ]);
        let group = vec![
            active("1", "a", 10).doubled(),
            active("2", "missing", 20),
            active("3", "b", 30),
            active("4", "c", 40),
        ];

        let shapes = PolygonUnionEngine::with_union(FailingUnion).merge(&group, &catalog);
        let ids: Vec<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);

        assert!(shapes[0].is_double);
        assert!(!shapes[1].is_double);
        assert_eq!(shapes[1].latest_timestamp, 30);
        assert_eq!(
            shapes[2].source_region_keys.iter().collect::<Vec<_>>(),
            vec!["c"]
        );
    }

    #[test]
    fn test_snapshot_merges_each_status_separately() {
        let catalog = InMemoryCatalog::from_regions(vec![
            square("a", 0.0, 0.0, 1.0),
            square("b", 0.5, 0.5, 1.0),
        ]);
        let snapshot = vec![
            active("1", "a", 1),
            AlertEvent::new("2", "b", AlertStatus::StoodDown, 2),
        ];

        let shapes = PolygonUnionEngine::new().merge_snapshot(&snapshot, &catalog);
        let ids: Vec<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["merged_alert_0", "merged_after_alert_0"]);
    }
}
