//! A realistic streaming session replayed through the assembler and feeds.

use alert_core::{AlertFeed, AlertStatus, RegionCatalog};
use alert_feed::{ChannelFeed, JsonCatalog, ReplayFeed, SnapshotAssembler};
use futures::StreamExt;

/// Events as the realtime database sends them for one subscription.
const SESSION: &[(&str, &str)] = &[
    ("put", r#"{"path":"/","data":null}"#),
    ("keep-alive", "null"),
    (
        "put",
        r#"{"path":"/","data":{
            "חיפה":{"id":"100","city_name":"Haifa","city_name_he":"חיפה","timestamp":1700000000000,"status":"pre_alert"},
            "עכו":{"id":"101","city_name":"Akko","city_name_he":"עכו","timestamp":1700000000100,"status":"pre_alert"}
        }}"#,
    ),
    ("put", r#"{"path":"/חיפה/status","data":"alert"}"#),
    (
        "patch",
        r#"{"path":"/","data":{
            "עכו":null,
            "נהריה":{"id":"102","city_name":"Nahariya","city_name_he":"נהריה","timestamp":1700000000200,"status":"alert","is_double":true}
        }}"#,
    ),
    ("put", r#"{"path":"/","data":null}"#),
];

#[test]
fn test_every_change_yields_the_whole_snapshot() {
    let mut assembler = SnapshotAssembler::new();
    let snapshots: Vec<_> = SESSION
        .iter()
        .filter_map(|(event, data)| assembler.apply(event, data).unwrap())
        .collect();

    assert_eq!(snapshots.len(), 5);
    assert!(snapshots[0].is_empty());

    assert_eq!(snapshots[1].len(), 2);
    assert!(snapshots[1].iter().all(|a| a.status == AlertStatus::PreAlert));

    let haifa = snapshots[2].iter().find(|a| a.id == "100").unwrap();
    assert_eq!(haifa.status, AlertStatus::Active);
    assert_eq!(haifa.display_name, "Haifa");
    assert_eq!(snapshots[2].len(), 2);

    let ids: Vec<_> = snapshots[3].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"100") && ids.contains(&"102"));
    assert!(snapshots[3].iter().any(|a| a.is_double));

    assert!(snapshots[4].is_empty());
}

#[tokio::test]
async fn test_channel_feed_carries_assembled_snapshots() {
    let (tx, feed) = ChannelFeed::new(8);
    let mut assembler = SnapshotAssembler::new();

    for (event, data) in SESSION {
        if let Some(snapshot) = assembler.apply(event, data).unwrap() {
            tx.send(Ok(snapshot)).await.unwrap();
        }
    }
    drop(tx);

    let sizes: Vec<usize> = feed
        .subscribe()
        .map(|item| item.map(|s| s.len()).unwrap_or(usize::MAX))
        .collect()
        .await;
    assert_eq!(sizes, vec![0, 2, 2, 2, 0]);
}

#[tokio::test]
async fn test_replayed_keys_resolve_in_catalog() {
    let catalog = JsonCatalog::from_json_str(
        r#"{
            "חיפה": {"city_name": "Haifa", "city_name_he": "חיפה",
                     "polygon": [[32.80, 34.98], [32.80, 35.02], [32.84, 35.02]]}
        }"#,
    )
    .unwrap();

    let feed = ReplayFeed::from_lines([
        r#"{"חיפה":{"id":"1","city_name":"Haifa","city_name_he":"חיפה","timestamp":1,"status":"alert"},
            "אילת":{"id":"2","city_name":"Eilat","city_name_he":"אילת","timestamp":2,"status":"alert"}}"#,
    ]);

    let snapshot = feed.subscribe().next().await.unwrap().unwrap();
    let resolved: Vec<_> = snapshot
        .iter()
        .filter(|a| catalog.get(&a.region_key).is_some())
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(resolved, vec!["1"]);
}
