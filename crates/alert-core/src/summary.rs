//! Per-snapshot counts and display ordering.

use indexmap::IndexMap;
use serde::Serialize;

use crate::event::AlertEvent;

/// Counts by status plus the alerts in display order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertSummary {
    pub total: usize,
    /// Status name to count, in the order statuses first appear.
    pub counts: IndexMap<String, usize>,
    /// Most severe status first, newest first within a status.
    pub ordered: Vec<AlertEvent>,
}

impl AlertSummary {
    pub fn from_snapshot(alerts: &[AlertEvent]) -> Self {
        let mut counts = IndexMap::new();
        for alert in alerts {
            *counts.entry(alert.status.as_str().to_string()).or_insert(0) += 1;
        }

        let mut ordered = alerts.to_vec();
        ordered.sort_by(|a, b| {
            a.status
                .priority()
                .cmp(&b.status.priority())
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });

        Self {
            total: alerts.len(),
            counts,
            ordered,
        }
    }

    pub fn count(&self, status: &str) -> usize {
        self.counts.get(status).copied().unwrap_or(0)
    }
}
