//! Decoding feed payloads into snapshots.

use alert_core::{AlertEvent, FeedError, Snapshot};
use serde_json::Value;
use tracing::warn;

/// Decode one feed payload.
///
/// Accepts the keyed object the realtime database stores, a plain array of
/// events, or `null` (an empty snapshot). Records that fail to decode are
/// skipped so the rest of the snapshot survives.
pub fn decode_payload(payload: Value) -> Result<Snapshot, FeedError> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Object(records) => Ok(records
            .into_iter()
            .filter_map(|(key, record)| decode_record(&key, record))
            .collect()),
        Value::Array(records) => Ok(records
            .into_iter()
            .enumerate()
            .filter(|(_, record)| !record.is_null())
            .filter_map(|(i, record)| decode_record(&i.to_string(), record))
            .collect()),
        other => Err(FeedError::Transport(format!(
            "unexpected payload type: {}",
            type_name(&other)
        ))),
    }
}

/// Decode a payload from its JSON text.
pub fn decode_str(raw: &str) -> Result<Snapshot, FeedError> {
    let payload: Value = serde_json::from_str(raw)?;
    decode_payload(payload)
}

fn decode_record(key: &str, record: Value) -> Option<AlertEvent> {
    match serde_json::from_value::<AlertEvent>(record) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(key = %key, "Skipping undecodable alert record: {}", e);
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
