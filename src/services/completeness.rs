//! Open-period detection for trend reliability.
//!
//! A bin whose period is still running only holds a partial count; feeding
//! it to the forecaster would bias the trend low. The oracle flags such
//! bins so callers can exclude them.

use chrono::{DateTime, Utc};

use crate::models::granularity::Granularity;
use crate::models::time::{bin_key_of, BinKey};

/// Whether the bin's period is still open at `now`.
///
/// A bin is incomplete iff its start falls in the same period as `now`
/// under the same granularity — equivalently, iff `now` bins to the same
/// key. Total over any key string: a key that matches no period simply
/// compares unequal.
pub fn is_incomplete(key: &BinKey, granularity: Granularity, now: DateTime<Utc>) -> bool {
    bin_key_of(now, granularity) == *key
}

/// Evaluate against live wall-clock time.
///
/// Called fresh on every use; the verdict for the current period changes
/// the moment the period rolls over, so it must never be cached.
pub fn is_incomplete_now(key: &BinKey, granularity: Granularity) -> bool {
    is_incomplete(key, granularity, Utc::now())
}
