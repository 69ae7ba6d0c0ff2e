//! New-arrival tracking for alert snapshots.
//!
//! Two independent diffs run on every snapshot:
//!
//! - **Viewport fit**: a snapshot that brings a region key the previous
//!   snapshot did not have asks the view to re-fit. Status changes alone
//!   never do.
//! - **Highlight window**: alerts that just became active are highlighted and
//!   scheduled for removal after the highlight window (5 s by default).
//!
//! [`ViewportFitPlanner`] turns a fit signal into bounds over every current
//! alert's polygon.
//!
//! # Example
//!
//! ```rust
//! use alert_core::{AlertEvent, AlertStatus};
//! use arrival_tracker::{FitSignal, NewArrivalTracker, TrackerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut tracker = NewArrivalTracker::new(TrackerConfig::default());
//!
//!     let update = tracker.update(&[AlertEvent::new("a1", "X", AlertStatus::Active, 0)]);
//!     assert_eq!(update.fit, FitSignal::Fit);
//!     assert_eq!(update.highlight_added, vec!["a1".to_string()]);
//!
//!     let update = tracker.update(&[AlertEvent::new("a1", "X", AlertStatus::StoodDown, 0)]);
//!     assert_eq!(update.fit, FitSignal::NoFit);
//!
//!     tracker.dispose();
//! }
//! ```

mod config;
mod error;
mod highlight;
mod planner;
mod tracker;

pub use config::{ExpiryMode, FitOptions, TrackerConfig, DEFAULT_HIGHLIGHT_WINDOW};
pub use error::ConfigError;
pub use highlight::HighlightState;
pub use planner::{polygon_points, ViewportFit, ViewportFitPlanner};
pub use tracker::{FitSignal, NewArrivalTracker, TrackerUpdate};
