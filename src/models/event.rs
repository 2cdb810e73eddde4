//! Passage event model and lenient wire decoding.
//!
//! Events arrive from two transports (bulk snapshot, push stream) as
//! JSON-shaped records. Decoding is element-wise: one malformed record is
//! dropped with a warning and never fails the surrounding payload.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::EventId;

/// A single vehicle passage observed by the producer.
///
/// `id` is producer-assigned, globally unique, and immutable; `category`
/// is an open string key (e.g. "car", "truck", "bus").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub category: String,
}

/// Wire-shaped passage record with every field optional, so a single
/// malformed element can be rejected without failing the whole array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPassageEvent {
    pub id: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

impl RawPassageEvent {
    /// Promote to a well-formed event; `None` if any field is missing.
    pub fn validate(self) -> Option<PassageEvent> {
        Some(PassageEvent {
            id: EventId::new(self.id?),
            timestamp: self.timestamp?,
            category: self.category?,
        })
    }
}

/// Per-id partial update consumed by human-correction workflows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassageCorrection {
    pub timestamp: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// Validate raw records, dropping malformed ones with a warning.
pub fn sanitize_raw(raw: Vec<RawPassageEvent>) -> Vec<PassageEvent> {
    let total = raw.len();
    let events: Vec<PassageEvent> = raw
        .into_iter()
        .filter_map(RawPassageEvent::validate)
        .collect();
    let dropped = total - events.len();
    if dropped > 0 {
        log::warn!(
            "dropped {} malformed passage record(s) out of {}",
            dropped,
            total
        );
    }
    events
}

/// Decode a JSON array of passage records.
///
/// The payload must be a JSON array; within it, records missing
/// id/timestamp/category (or of the wrong shape entirely) are dropped.
pub fn decode_events(payload: &str) -> Result<Vec<PassageEvent>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(payload).context("passage payload is not a JSON array")?;
    let raw = values
        .into_iter()
        .map(|value| serde_json::from_value::<RawPassageEvent>(value).unwrap_or_default())
        .collect();
    Ok(sanitize_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::{decode_events, sanitize_raw, RawPassageEvent};

    #[test]
    fn test_validate_complete_record() {
        let raw = RawPassageEvent {
            id: Some(7),
            timestamp: Some("2025-01-05T13:27:45Z".parse().unwrap()),
            category: Some("car".to_string()),
        };
        let event = raw.validate().unwrap();
        assert_eq!(event.id.value(), 7);
        assert_eq!(event.category, "car");
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let missing_id = RawPassageEvent {
            id: None,
            timestamp: Some("2025-01-05T13:27:45Z".parse().unwrap()),
            category: Some("car".to_string()),
        };
        assert!(missing_id.validate().is_none());

        let missing_category = RawPassageEvent {
            id: Some(1),
            timestamp: Some("2025-01-05T13:27:45Z".parse().unwrap()),
            category: None,
        };
        assert!(missing_category.validate().is_none());
    }

    #[test]
    fn test_sanitize_drops_only_malformed() {
        let raw = vec![
            RawPassageEvent {
                id: Some(1),
                timestamp: Some("2025-01-05T13:00:00Z".parse().unwrap()),
                category: Some("car".to_string()),
            },
            RawPassageEvent::default(),
            RawPassageEvent {
                id: Some(2),
                timestamp: Some("2025-01-05T14:00:00Z".parse().unwrap()),
                category: Some("truck".to_string()),
            },
        ];
        let events = sanitize_raw(raw);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.value(), 1);
        assert_eq!(events[1].id.value(), 2);
    }

    #[test]
    fn test_decode_events_drops_malformed_element() {
        let payload = r#"[
            {"id": 1, "timestamp": "2025-01-05T13:00:00Z", "category": "car"},
            {"timestamp": "2025-01-05T13:05:00Z", "category": "bus"},
            "not an object",
            {"id": 2, "timestamp": "2025-01-05T13:10:00Z", "category": "truck"}
        ]"#;
        let events = decode_events(payload).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_decode_events_rejects_non_array_payload() {
        assert!(decode_events(r#"{"id": 1}"#).is_err());
        assert!(decode_events("not json").is_err());
    }
}
