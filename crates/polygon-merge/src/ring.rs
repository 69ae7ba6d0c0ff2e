//! Ring validation and coordinate conversion.
//!
//! Catalog rings are (lat, lng). Geometry operations run on (x = lng, y = lat)
//! and results are converted back before they leave the crate.

use std::collections::HashSet;

use alert_core::LatLng;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{coord, Coord, Line, LineString, Polygon};

/// Turn a catalog ring into a closed polygon ready for boolean operations.
///
/// Returns `None` for rings with non-finite points or fewer than three distinct
/// points. Self-intersecting and collinear rings are kept; the union rejects
/// them later.
pub fn prepare_ring(ring: &[LatLng]) -> Option<Polygon<f64>> {
    if ring.iter().any(|point| !point.is_finite()) {
        return None;
    }

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.len() + 1);
    for point in ring {
        let c = coord! { x: point.lng, y: point.lat };
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    let distinct: HashSet<(u64, u64)> = coords
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    if distinct.len() < 3 {
        return None;
    }

    let first = coords[0];
    coords.push(first);

    Some(Polygon::new(LineString::from(coords), vec![]))
}

/// Convert a closed geo ring back to (lat, lng) points.
pub(crate) fn to_lat_lng(ring: &LineString<f64>) -> Vec<LatLng> {
    ring.coords().map(|c| LatLng::new(c.y, c.x)).collect()
}

/// Whether a closed ring crosses or overlaps itself.
///
/// Neighbouring edges may share their common vertex; any other contact
/// between edges counts as an intersection.
pub fn ring_self_intersects(ring: &LineString<f64>) -> bool {
    let edges: Vec<Line<f64>> = ring.lines().filter(|l| l.start != l.end).collect();
    let n = edges.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::Collinear { .. }) => return true,
                Some(LineIntersection::SinglePoint { .. }) if !adjacent => return true,
                Some(LineIntersection::SinglePoint { .. }) => {}
            }
        }
    }
    false
}
