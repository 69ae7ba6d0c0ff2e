//! Renderer hints per shape.

use serde::Serialize;

use crate::event::AlertStatus;

const CLASS_DOUBLE: &str = "alert-polygon-double";
const CLASS_NEW: &str = "alert-polygon-new";

/// Stroke and fill hints for one rendered shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeStyle {
    pub color: &'static str,
    pub weight: u8,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
}

impl ShapeStyle {
    /// Style for a shape of the given status.
    ///
    /// Unknown statuses are drawn like active alerts.
    pub fn for_shape(status: &AlertStatus, is_double: bool, is_new: bool) -> Self {
        let mut style = match status {
            AlertStatus::PreAlert => Self {
                color: "red",
                weight: 3,
                fill_color: "red",
                fill_opacity: 0.0,
                class_name: String::new(),
                dash_array: Some("5, 5"),
            },
            AlertStatus::StoodDown => Self::plain("#6b7280", "#9ca3af", 0.3),
            AlertStatus::Advisory => Self::plain("#eab308", "#fef08a", 0.4),
            AlertStatus::Active | AlertStatus::Other(_) => {
                let mut style = Self::plain("red", "red", if is_double { 0.5 } else { 0.4 });
                if is_double && status.is_active() {
                    style.class_name.push_str(CLASS_DOUBLE);
                }
                style
            }
        };

        if is_new {
            if !style.class_name.is_empty() {
                style.class_name.push(' ');
            }
            style.class_name.push_str(CLASS_NEW);
        }

        style
    }

    fn plain(color: &'static str, fill_color: &'static str, fill_opacity: f32) -> Self {
        Self {
            color,
            weight: 2,
            fill_color,
            fill_opacity,
            class_name: String::new(),
            dash_array: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_double() {
        let style = ShapeStyle::for_shape(&AlertStatus::Active, true, false);
        assert_eq!(style.color, "red");
        assert_eq!(style.fill_opacity, 0.5);
        assert_eq!(style.class_name, "alert-polygon-double");
    }

    #[test]
    fn test_pre_alert_is_dashed_outline() {
        let style = ShapeStyle::for_shape(&AlertStatus::PreAlert, true, false);
        assert_eq!(style.weight, 3);
        assert_eq!(style.fill_opacity, 0.0);
        assert_eq!(style.dash_array, Some("5, 5"));
        assert!(style.class_name.is_empty());
    }

    #[test]
    fn test_stood_down_and_advisory_colors() {
        let stood_down = ShapeStyle::for_shape(&AlertStatus::StoodDown, false, false);
        assert_eq!(stood_down.color, "#6b7280");
        assert_eq!(stood_down.fill_opacity, 0.3);

        let advisory = ShapeStyle::for_shape(&AlertStatus::Advisory, false, false);
        assert_eq!(advisory.fill_color, "#fef08a");
    }

    #[test]
    fn test_new_tag_is_appended() {
        let style = ShapeStyle::for_shape(&AlertStatus::Active, true, true);
        assert_eq!(style.class_name, "alert-polygon-double alert-polygon-new");

        let style = ShapeStyle::for_shape(&AlertStatus::Active, false, true);
        assert_eq!(style.class_name, "alert-polygon-new");
    }

    #[test]
    fn test_unknown_status_drawn_as_active_without_double_class() {
        let style = ShapeStyle::for_shape(&AlertStatus::Other("drill".into()), true, false);
        assert_eq!(style.color, "red");
        assert!(style.class_name.is_empty());
    }
}
