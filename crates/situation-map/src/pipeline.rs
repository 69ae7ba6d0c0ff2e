//! One pass from a snapshot to a render frame.

use alert_core::{AlertEvent, AlertSummary, RegionCatalog};
use arrival_tracker::{
    polygon_points, HighlightState, NewArrivalTracker, ViewportFitPlanner,
};
use polygon_merge::PolygonUnionEngine;
use tracing::debug;

use crate::config::SituationConfig;
use crate::frame::{RenderFrame, RenderedShape};

/// Wires the merge engine, the arrival tracker and the fit planner together.
///
/// Each call to [`apply`](Self::apply) runs synchronously to completion.
#[derive(Debug)]
pub struct SituationMap<C> {
    catalog: C,
    engine: PolygonUnionEngine,
    tracker: NewArrivalTracker,
    planner: ViewportFitPlanner,
}

impl<C: RegionCatalog> SituationMap<C> {
    pub fn new(catalog: C, config: &SituationConfig) -> Self {
        Self {
            catalog,
            engine: PolygonUnionEngine::new(),
            tracker: NewArrivalTracker::new(config.tracker.clone()),
            planner: ViewportFitPlanner::new(config.fit.clone()),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Handle to the live highlight state.
    pub fn highlights(&self) -> HighlightState {
        self.tracker.highlights()
    }

    /// Process a full snapshot.
    pub fn apply(&mut self, snapshot: &[AlertEvent]) -> RenderFrame {
        let update = self.tracker.update(snapshot);
        let shapes = self.engine.merge_snapshot(snapshot, &self.catalog);
        let highlighted = self.tracker.highlights().ids();

        let fit = self
            .planner
            .plan_fit(update.fit, &polygon_points(snapshot, &self.catalog));

        debug!(
            alerts = snapshot.len(),
            shapes = shapes.len(),
            new = update.highlight_added.len(),
            fit = fit.is_some(),
            "Snapshot applied"
        );

        RenderFrame {
            shapes: shapes
                .into_iter()
                .map(|shape| RenderedShape::new(shape, &highlighted))
                .collect(),
            highlighted,
            fit,
            summary: AlertSummary::from_snapshot(snapshot),
        }
    }

    /// Restyle a previous frame for the current highlight set.
    pub fn refresh(&self, frame: &RenderFrame) -> RenderFrame {
        frame.with_highlights(self.tracker.highlights().ids())
    }

    /// Cancel pending highlight timers.
    pub fn dispose(&mut self) {
        self.tracker.dispose();
    }
}
