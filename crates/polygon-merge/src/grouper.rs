//! Partitioning a snapshot by status.

use alert_core::{AlertEvent, AlertStatus};
use indexmap::IndexMap;

/// Status to alerts, groups in first-seen order, alerts in snapshot order.
pub type StatusGroups = IndexMap<AlertStatus, Vec<AlertEvent>>;

/// Partition a snapshot by status.
///
/// Every alert lands in exactly one group. Unknown statuses get their own
/// group.
pub fn group_by_status(alerts: &[AlertEvent]) -> StatusGroups {
    let mut groups = StatusGroups::new();
    for alert in alerts {
        groups
            .entry(alert.status.clone())
            .or_default()
            .push(alert.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_preserve_order() {
        let alerts = vec![
            AlertEvent::new("1", "a", AlertStatus::PreAlert, 0),
            AlertEvent::new("2", "b", AlertStatus::Active, 0),
            AlertEvent::new("3", "c", AlertStatus::PreAlert, 0),
            AlertEvent::new("4", "d", AlertStatus::Other("drill".into()), 0),
        ];

        let groups = group_by_status(&alerts);
        assert_eq!(groups.len(), 3);

        let keys: Vec<_> = groups.keys().map(|s| s.as_str()).collect();
        assert_eq!(keys, vec!["pre_alert", "alert", "drill"]);

        let pre: Vec<_> = groups[&AlertStatus::PreAlert]
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(pre, vec!["1", "3"]);
    }

    #[test]
    fn test_partition_covers_snapshot() {
        let alerts = vec![
            AlertEvent::new("1", "a", AlertStatus::Active, 0),
            AlertEvent::new("2", "b", AlertStatus::StoodDown, 0),
            AlertEvent::new("3", "c", AlertStatus::Active, 0),
        ];
        let groups = group_by_status(&alerts);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, alerts.len());
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(group_by_status(&[]).is_empty());
    }
}
