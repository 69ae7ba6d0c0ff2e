//! Alert event types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The complete set of active alerts at one point in time.
pub type Snapshot = Vec<AlertEvent>;

/// Status of an alerted region.
///
/// Wire values follow the upstream feed (`alert`, `pre_alert`, `after_alert`,
/// `telegram_yellow`). Unknown values are kept verbatim in [`AlertStatus::Other`]
/// so they still form their own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    /// Early warning ahead of an alert.
    PreAlert,
    /// The most severe status: an alert is in effect.
    Active,
    /// The alert has ended and the region is standing down.
    StoodDown,
    /// Unconfirmed intelligence report.
    Advisory,
    /// Any status the feed sends that we do not know about.
    Other(String),
}

impl AlertStatus {
    /// Source-domain name of the status, as used on the wire and in shape ids.
    pub fn as_str(&self) -> &str {
        match self {
            AlertStatus::PreAlert => "pre_alert",
            AlertStatus::Active => "alert",
            AlertStatus::StoodDown => "after_alert",
            AlertStatus::Advisory => "telegram_yellow",
            AlertStatus::Other(raw) => raw,
        }
    }

    /// Whether this is the most severe status.
    pub fn is_active(&self) -> bool {
        matches!(self, AlertStatus::Active)
    }

    /// Display ordering: lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            AlertStatus::Active => 0,
            AlertStatus::PreAlert => 1,
            AlertStatus::Advisory => 2,
            AlertStatus::StoodDown => 3,
            AlertStatus::Other(_) => 9,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "alert" | "active" => AlertStatus::Active,
            "pre_alert" => AlertStatus::PreAlert,
            "after_alert" | "stood_down" => AlertStatus::StoodDown,
            "telegram_yellow" | "advisory" => AlertStatus::Advisory,
            _ => AlertStatus::Other(raw),
        }
    }
}

impl From<&str> for AlertStatus {
    fn from(raw: &str) -> Self {
        AlertStatus::from(raw.to_string())
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        match status {
            AlertStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alerted region as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: String,
    /// Catalog lookup key for the region polygon.
    #[serde(alias = "city_name_he")]
    pub region_key: String,
    #[serde(alias = "city_name", default)]
    pub display_name: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub status: AlertStatus,
    /// The region is under two overlapping alert reasons.
    #[serde(default)]
    pub is_double: bool,
}

impl AlertEvent {
    /// Create an event with the display name defaulting to the region key.
    pub fn new(
        id: impl Into<String>,
        region_key: impl Into<String>,
        status: AlertStatus,
        timestamp: i64,
    ) -> Self {
        let region_key = region_key.into();
        Self {
            id: id.into(),
            display_name: region_key.clone(),
            region_key,
            timestamp,
            status,
            is_double: false,
        }
    }

    /// Mark the event as doubled.
    pub fn doubled(mut self) -> Self {
        self.is_double = true;
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}
