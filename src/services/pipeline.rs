//! Full-series assembly: filter → aggregate → forecast.
//!
//! There is no incremental update path. Callers rebuild the whole view
//! whenever a dependency changes (event set, granularity, filters, date
//! range); recomputation cost is traded for the absence of
//! incremental-update bugs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate, filter_events, AggregatedBin};
use super::forecast::{forecast, ForecastBin};
use crate::models::event::PassageEvent;
use crate::models::granularity::Granularity;

/// Parameters of one series view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesQuery {
    pub granularity: Granularity,
    /// Inclusive lower bound of the date-range filter.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound of the date-range filter.
    pub to: Option<DateTime<Utc>>,
    /// Restrict to these categories; `None` keeps every observed one.
    pub categories: Option<Vec<String>>,
}

impl SeriesQuery {
    pub fn new(granularity: Granularity) -> Self {
        SeriesQuery {
            granularity,
            from: None,
            to: None,
            categories: None,
        }
    }
}

/// Complete series dataset for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesView {
    pub bins: Vec<AggregatedBin>,
    /// Category universe of `bins`, ascending.
    pub categories: Vec<String>,
    pub forecast: Option<ForecastBin>,
}

/// Rebuild the whole series view from scratch.
pub fn build_series(
    events: &[PassageEvent],
    query: &SeriesQuery,
    now: DateTime<Utc>,
) -> SeriesView {
    let filtered = filter_events(events, query.from, query.to, query.categories.as_deref());
    let bins = aggregate(&filtered, query.granularity);
    // Bins are rectangular, so any one of them carries the universe.
    let categories: Vec<String> = bins
        .first()
        .map(|bin| bin.counts.keys().cloned().collect())
        .unwrap_or_default();
    let forecast = forecast(&bins, query.granularity, &categories, now);
    SeriesView {
        bins,
        categories,
        forecast,
    }
}
