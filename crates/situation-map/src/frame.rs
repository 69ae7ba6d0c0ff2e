//! What the renderer receives after each pass.

use alert_core::{AlertSummary, LatLng, MergedShape, ShapeStyle};
use arrival_tracker::ViewportFit;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

/// One merged shape with its style for this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedShape {
    pub shape: MergedShape,
    pub style: ShapeStyle,
    /// Some contributing alert is currently highlighted.
    pub is_new: bool,
}

impl RenderedShape {
    pub fn new(shape: MergedShape, highlighted: &[String]) -> Self {
        let is_new = shape.touches_any(highlighted);
        let style = ShapeStyle::for_shape(&shape.status, shape.is_double, is_new);
        Self {
            shape,
            style,
            is_new,
        }
    }

    fn to_feature(&self) -> Feature {
        let rings: Vec<Vec<Vec<f64>>> = self
            .shape
            .components
            .iter()
            .map(|ring| closed_positions(ring))
            .collect();

        let value = if rings.len() == 1 {
            Value::Polygon(rings)
        } else {
            Value::MultiPolygon(rings.into_iter().map(|ring| vec![ring]).collect())
        };

        let mut properties = JsonObject::new();
        properties.insert("status".into(), self.shape.status.as_str().into());
        properties.insert("is_double".into(), self.shape.is_double.into());
        properties.insert("is_new".into(), self.is_new.into());
        properties.insert("timestamp".into(), self.shape.latest_timestamp.into());
        properties.insert(
            "region_keys".into(),
            self.shape
                .source_region_keys
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .into(),
        );
        properties.insert(
            "alert_ids".into(),
            self.shape
                .source_alert_ids
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .into(),
        );
        properties.insert(
            "style".into(),
            serde_json::to_value(&self.style).unwrap_or_default(),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: Some(Id::String(self.shape.id.clone())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// GeoJSON positions are `[lng, lat]` and rings repeat their first point.
fn closed_positions(ring: &[LatLng]) -> Vec<Vec<f64>> {
    let mut positions: Vec<Vec<f64>> = ring.iter().map(|p| vec![p.lng, p.lat]).collect();
    let first = positions.first().cloned();
    if first.is_some() && first.as_ref() != positions.last() {
        positions.extend(first);
    }
    positions
}

/// The output of one pipeline pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub shapes: Vec<RenderedShape>,
    /// Currently highlighted alert ids.
    pub highlighted: Vec<String>,
    /// Present only when the view should re-fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<ViewportFit>,
    pub summary: AlertSummary,
}

impl RenderFrame {
    /// The same shapes restyled for a new highlight set, without a fit.
    pub fn with_highlights(&self, highlighted: Vec<String>) -> Self {
        let shapes = self
            .shapes
            .iter()
            .map(|rendered| RenderedShape::new(rendered.shape.clone(), &highlighted))
            .collect();

        Self {
            shapes,
            highlighted,
            fit: None,
            summary: self.summary.clone(),
        }
    }

    /// Shapes as a GeoJSON feature collection.
    ///
    /// The collection's `bbox` is the fit bounds when the frame carries a fit.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: self.fit.as_ref().map(|fit| {
                let b = fit.bounds;
                vec![b.west, b.south, b.east, b.north]
            }),
            features: self.shapes.iter().map(RenderedShape::to_feature).collect(),
            foreign_members: None,
        }
    }
}
