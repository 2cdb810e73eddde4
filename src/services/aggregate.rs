//! Per-bin, per-category aggregation of passage events.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::event::PassageEvent;
use crate::models::granularity::Granularity;
use crate::models::time::{bin_key_of, display_label_of, BinKey};

/// One time bucket of a rectangular aggregate series.
///
/// Invariant: every bin produced by one [`aggregate`] call carries the
/// identical set of category keys, zero-filled where a category did not
/// occur in that bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedBin {
    pub bin_key: BinKey,
    pub display_label: String,
    pub counts: BTreeMap<String, u64>,
}

/// Fold an event array into per-bin, per-category counts.
///
/// Bins are sorted ascending by key (lexicographic order equals
/// chronological order for the canonical key forms). The category
/// universe is the set of distinct categories observed across `events`.
/// O(n) over events plus O(bins × categories) to rectangularize.
pub fn aggregate(events: &[PassageEvent], granularity: Granularity) -> Vec<AggregatedBin> {
    // Category universe first so every bin can be zero-filled below.
    let categories: BTreeSet<&str> = events.iter().map(|e| e.category.as_str()).collect();

    // BTreeMap keeps bins in ascending key order. One representative
    // instant per bin feeds the display label.
    let mut bins: BTreeMap<BinKey, (DateTime<Utc>, BTreeMap<String, u64>)> = BTreeMap::new();
    for event in events {
        let key = bin_key_of(event.timestamp, granularity);
        let entry = bins
            .entry(key)
            .or_insert_with(|| (event.timestamp, BTreeMap::new()));
        *entry.1.entry(event.category.clone()).or_insert(0) += 1;
    }

    bins.into_iter()
        .map(|(bin_key, (instant, mut counts))| {
            for category in &categories {
                counts.entry((*category).to_string()).or_insert(0);
            }
            AggregatedBin {
                display_label: display_label_of(instant, granularity),
                bin_key,
                counts,
            }
        })
        .collect()
}

/// External date-range and category filter applied ahead of aggregation.
///
/// Bounds are half-open `[from, to)`; `None` leaves that side unbounded.
/// A `None` category list keeps every category.
pub fn filter_events(
    events: &[PassageEvent],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    categories: Option<&[String]>,
) -> Vec<PassageEvent> {
    events
        .iter()
        .filter(|event| from.is_none_or(|from| event.timestamp >= from))
        .filter(|event| to.is_none_or(|to| event.timestamp < to))
        .filter(|event| {
            categories.is_none_or(|categories| {
                categories.iter().any(|c| c == &event.category)
            })
        })
        .cloned()
        .collect()
}
