//! Drill-down: re-aggregation at the next-finer granularity inside one
//! parent bin's time extent.

use crate::models::event::PassageEvent;
use crate::models::granularity::Granularity;
use crate::models::time::{period_after, BinKey, TimeError};

use super::aggregate::{aggregate, AggregatedBin};

/// Re-aggregate `base_events` at the granularity one step below
/// `parent_granularity`, scoped to the parent bin's period.
///
/// `base_events` is expected to be the already-filtered working set; the
/// half-open parent bound `[start, start + one period)` replaces any
/// external date-range filter exactly, so none is applied here.
pub fn drill_down(
    parent_key: &BinKey,
    parent_granularity: Granularity,
    base_events: &[PassageEvent],
) -> Result<Vec<AggregatedBin>, TimeError> {
    let child = parent_granularity.drill_down();
    let start = parent_key.start_instant(parent_granularity)?;
    let end = period_after(start, parent_granularity).ok_or_else(|| TimeError::InvalidBinKey {
        key: parent_key.to_string(),
        granularity: parent_granularity,
    })?;

    let scoped: Vec<PassageEvent> = base_events
        .iter()
        .filter(|event| event.timestamp >= start && event.timestamp < end)
        .cloned()
        .collect();

    Ok(aggregate(&scoped, child))
}
