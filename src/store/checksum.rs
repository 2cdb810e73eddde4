//! Snapshot fingerprinting for re-delivery observation.

use sha2::{Digest, Sha256};

use crate::models::event::PassageEvent;

/// SHA-256 fingerprint of decoded events, independent of payload
/// formatting and arrival order: records are hashed in id order.
pub fn events_fingerprint(events: &[PassageEvent]) -> String {
    let mut ordered: Vec<&PassageEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.id);

    let mut hasher = Sha256::new();
    for event in ordered {
        hasher.update(event.id.value().to_be_bytes());
        hasher.update(event.timestamp.timestamp_millis().to_be_bytes());
        hasher.update(event.category.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::events_fingerprint;
    use crate::api::EventId;
    use crate::models::event::PassageEvent;

    fn create_test_event(id: i64, timestamp: &str, category: &str) -> PassageEvent {
        PassageEvent {
            id: EventId::new(id),
            timestamp: timestamp.parse().unwrap(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let event = create_test_event(1, "2025-01-05T13:00:00Z", "car");
        assert_eq!(
            events_fingerprint(&[event.clone()]),
            events_fingerprint(&[event])
        );
    }

    #[test]
    fn test_fingerprint_empty_snapshot() {
        assert_eq!(events_fingerprint(&[]), events_fingerprint(&[]));
    }

    #[test]
    fn test_events_fingerprint_ignores_order() {
        let a = create_test_event(1, "2025-01-05T13:00:00Z", "car");
        let b = create_test_event(2, "2025-01-05T14:00:00Z", "truck");
        assert_eq!(
            events_fingerprint(&[a.clone(), b.clone()]),
            events_fingerprint(&[b, a])
        );
    }

    #[test]
    fn test_events_fingerprint_detects_payload_change() {
        let a = create_test_event(1, "2025-01-05T13:00:00Z", "car");
        let mut changed = a.clone();
        changed.category = "bus".to_string();
        assert_ne!(events_fingerprint(&[a]), events_fingerprint(&[changed]));
    }
}
