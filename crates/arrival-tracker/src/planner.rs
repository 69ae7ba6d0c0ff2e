//! Viewport fit planning.

use alert_core::{AlertEvent, BoundingBox, LatLng, RegionCatalog};
use geo::{BoundingRect, MultiPoint, Point};
use serde::Serialize;

use crate::config::FitOptions;
use crate::tracker::FitSignal;

/// Bounds to fit plus how the renderer should animate there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportFit {
    pub bounds: BoundingBox,
    pub options: FitOptions,
}

/// Turns fit signals into bounding boxes.
#[derive(Debug, Clone, Default)]
pub struct ViewportFitPlanner {
    options: FitOptions,
}

impl ViewportFitPlanner {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Minimal bounds over `points` when signalled to fit.
    ///
    /// Returns `None` for [`FitSignal::NoFit`] or when no finite point is given.
    pub fn plan<'a>(
        &self,
        signal: FitSignal,
        points: impl IntoIterator<Item = &'a LatLng>,
    ) -> Option<BoundingBox> {
        if signal == FitSignal::NoFit {
            return None;
        }

        let points: MultiPoint<f64> = points
            .into_iter()
            .filter(|p| p.is_finite())
            .map(|p| Point::new(p.lng, p.lat))
            .collect();
        let rect = points.bounding_rect()?;

        Some(BoundingBox::new(
            LatLng::new(rect.min().y, rect.min().x),
            LatLng::new(rect.max().y, rect.max().x),
        ))
    }

    /// Like [`plan`](Self::plan), bundled with the presentation options.
    pub fn plan_fit<'a>(
        &self,
        signal: FitSignal,
        points: impl IntoIterator<Item = &'a LatLng>,
    ) -> Option<ViewportFit> {
        self.plan(signal, points).map(|bounds| ViewportFit {
            bounds,
            options: self.options.clone(),
        })
    }
}

/// Every catalog point of every alert in the snapshot.
///
/// Alerts without a catalog entry contribute nothing.
pub fn polygon_points<C>(snapshot: &[AlertEvent], catalog: &C) -> Vec<LatLng>
where
    C: RegionCatalog + ?Sized,
{
    snapshot
        .iter()
        .filter_map(|alert| catalog.get(&alert.region_key))
        .flat_map(|region| region.ring.iter().copied())
        .collect()
}
