//! The pairwise union capability.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{BooleanOps, CoordsIter, MultiPolygon};

use crate::error::UnionError;
use crate::ring::ring_self_intersects;

/// Pairwise polygon union.
///
/// Implementations must terminate and must not panic; any failure is a
/// [`UnionError`]. Coordinates are (x = lng, y = lat).
pub trait GeometryUnion {
    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, UnionError>;
}

/// Union backed by the `geo` crate's boolean operations.
///
/// Operands are checked for self-intersecting rings first, since the sweep
/// gives unspecified output for them. Panics inside the sweep are caught.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBooleanUnion;

impl GeoBooleanUnion {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryUnion for GeoBooleanUnion {
    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, UnionError> {
        if has_self_intersection(a) || has_self_intersection(b) {
            return Err(UnionError::SelfIntersection);
        }

        let merged = catch_unwind(AssertUnwindSafe(|| a.union(b)))
            .map_err(|payload| UnionError::Panicked(panic_message(payload.as_ref())))?;

        if merged.0.is_empty() {
            return Err(UnionError::Empty);
        }
        if merged
            .coords_iter()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(UnionError::NonFinite);
        }
        Ok(merged)
    }
}

fn has_self_intersection(geometry: &MultiPolygon<f64>) -> bool {
    geometry.iter().any(|polygon| {
        ring_self_intersects(polygon.exterior())
            || polygon.interiors().iter().any(ring_self_intersects)
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
