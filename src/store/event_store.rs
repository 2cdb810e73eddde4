//! In-memory passage event store with live/REST merge semantics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::checksum::events_fingerprint;
use crate::api::EventId;
use crate::models::event::{PassageCorrection, PassageEvent};

/// Authoritative per-session id → event map.
///
/// Absorbs the one-time bulk snapshot and individually streamed events;
/// both legs are insert-or-replace per id, so the same id arriving twice
/// (identical or conflicting payload) merges to exactly one record with
/// the most recently applied value winning. Ids are producer-assigned
/// exactly once, making replace-on-id a safety net rather than the
/// expected path.
///
/// This is an explicit, owned object passed into the aggregation
/// pipeline; there is no process-wide store.
#[derive(Debug, Default)]
pub struct EventStore {
    events: HashMap<EventId, PassageEvent>,
    last_stream_at: Option<DateTime<Utc>>,
    last_snapshot_fingerprint: Option<String>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&PassageEvent> {
        self.events.get(&id)
    }

    /// Absorb a full snapshot: insert-or-replace per id.
    ///
    /// Idempotent for a repeated identical snapshot; a byte-identical
    /// re-delivery is detected via fingerprint and logged.
    pub fn absorb_snapshot(&mut self, events: Vec<PassageEvent>) {
        let fingerprint = events_fingerprint(&events);
        if self.last_snapshot_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            log::debug!(
                "snapshot re-delivered with identical fingerprint {}",
                fingerprint
            );
        }
        for event in events {
            self.events.insert(event.id, event);
        }
        self.last_snapshot_fingerprint = Some(fingerprint);
    }

    /// Absorb one streamed event (O(1) upsert, burst-tolerant) and stamp
    /// the observation point for latency instrumentation.
    pub fn absorb_stream_event(&mut self, event: PassageEvent) {
        self.events.insert(event.id, event);
        self.last_stream_at = Some(Utc::now());
    }

    /// Deduplicated, order-irrelevant working set for the aggregator.
    pub fn merged_events(&self) -> Vec<PassageEvent> {
        self.events.values().cloned().collect()
    }

    /// Per-id partial update for human-correction workflows.
    ///
    /// Returns whether the id existed; the id itself is immutable.
    pub fn correct(&mut self, id: EventId, correction: &PassageCorrection) -> bool {
        match self.events.get_mut(&id) {
            Some(event) => {
                if let Some(timestamp) = correction.timestamp {
                    event.timestamp = timestamp;
                }
                if let Some(category) = &correction.category {
                    event.category = category.clone();
                }
                true
            }
            None => {
                log::warn!("correction for unknown passage id {}", id);
                false
            }
        }
    }

    /// Instant of the most recent stream absorption, if any.
    pub fn last_stream_at(&self) -> Option<DateTime<Utc>> {
        self.last_stream_at
    }

    /// Fingerprint of the most recently absorbed snapshot, if any.
    pub fn last_snapshot_fingerprint(&self) -> Option<&str> {
        self.last_snapshot_fingerprint.as_deref()
    }
}
