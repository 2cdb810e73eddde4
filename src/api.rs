//! Public API surface for the analytics engine.
//!
//! This file consolidates the types and functions consumed by embedding
//! views. All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::event::{
    decode_events, sanitize_raw, PassageCorrection, PassageEvent, RawPassageEvent,
};
pub use crate::models::granularity::Granularity;
pub use crate::models::time::{
    bin_key_of, display_label, display_label_of, next_key, BinKey, TimeError,
};
pub use crate::services::aggregate::{aggregate, filter_events, AggregatedBin};
pub use crate::services::completeness::{is_incomplete, is_incomplete_now};
pub use crate::services::drilldown::drill_down;
pub use crate::services::forecast::{forecast, ForecastBin, HOLT_ALPHA, HOLT_BETA};
pub use crate::services::pipeline::{build_series, SeriesQuery, SeriesView};
pub use crate::store::event_store::EventStore;

use serde::{Deserialize, Serialize};

/// Passage event identifier (producer-assigned, globally unique).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EventId(pub i64);

impl EventId {
    pub fn new(value: i64) -> Self {
        EventId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventId> for i64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId(value)
    }
}
