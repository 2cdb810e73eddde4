//! Bin keys: canonical period identifiers for time-bucketed aggregation.
//!
//! A bin key is a string whose lexicographic order equals chronological
//! order within one granularity, and which maps losslessly back to the
//! UTC start instant of its period:
//!
//! - Hour:  `YYYY-MM-DDTHH`
//! - Day:   `YYYY-MM-DD`
//! - Week:  `YYYY-MM-DD` (the Monday starting the ISO-8601 week)
//! - Month: `YYYY-MM`
//!
//! Week keys carry the Monday date rather than a year/week-number pair, so
//! a week spanning a year boundary has exactly one key; the ISO week-year
//! attribution only surfaces in the display label.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::granularity::Granularity;

/// Canonical key of one time bucket.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BinKey(pub String);

impl BinKey {
    pub fn new(key: impl Into<String>) -> Self {
        BinKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reverse mapping: the UTC instant at which this bin's period starts.
    ///
    /// Week keys must name a Monday; any key not in the canonical format
    /// for `granularity` is rejected.
    pub fn start_instant(&self, granularity: Granularity) -> Result<DateTime<Utc>, TimeError> {
        let invalid = || TimeError::InvalidBinKey {
            key: self.0.clone(),
            granularity,
        };

        let naive = match granularity {
            Granularity::Hour => {
                let (date, hour) = self.0.split_once('T').ok_or_else(invalid)?;
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
                let hour: u32 = hour.parse().map_err(|_| invalid())?;
                date.and_hms_opt(hour, 0, 0).ok_or_else(invalid)?
            }
            Granularity::Day | Granularity::Week => {
                let date =
                    NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").map_err(|_| invalid())?;
                if granularity == Granularity::Week && date.weekday() != chrono::Weekday::Mon {
                    return Err(invalid());
                }
                date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?
            }
            Granularity::Month => {
                let date = NaiveDate::parse_from_str(&format!("{}-01", self.0), "%Y-%m-%d")
                    .map_err(|_| invalid())?;
                date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?
            }
        };

        Ok(Utc.from_utc_datetime(&naive))
    }
}

impl std::fmt::Display for BinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for bin-key operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeError {
    #[error("invalid bin key `{key}` for granularity {granularity}")]
    InvalidBinKey { key: String, granularity: Granularity },
}

/// Monday starting the ISO-8601 week that contains `date`.
///
/// Shared by the Week bin key and the week display label so the two can
/// never disagree near a year boundary.
pub fn iso_week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Canonical bin key of the period containing `instant`.
pub fn bin_key_of(instant: DateTime<Utc>, granularity: Granularity) -> BinKey {
    let key = match granularity {
        Granularity::Hour => instant.format("%Y-%m-%dT%H").to_string(),
        Granularity::Day => instant.format("%Y-%m-%d").to_string(),
        Granularity::Week => iso_week_monday(instant.date_naive())
            .format("%Y-%m-%d")
            .to_string(),
        Granularity::Month => instant.format("%Y-%m").to_string(),
    };
    BinKey(key)
}

/// Start of the period immediately after the one beginning at `start`.
///
/// `None` only on calendar overflow far outside any practical range.
pub fn period_after(start: DateTime<Utc>, granularity: Granularity) -> Option<DateTime<Utc>> {
    match granularity {
        Granularity::Hour => start.checked_add_signed(Duration::hours(1)),
        Granularity::Day => start.checked_add_signed(Duration::days(1)),
        Granularity::Week => start.checked_add_signed(Duration::days(7)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
    }
}

/// Successor key: the key of the period immediately following `key`.
///
/// Repeated application visits every subsequent period exactly once, with
/// no gaps or repeats.
pub fn next_key(key: &BinKey, granularity: Granularity) -> Result<BinKey, TimeError> {
    let start = key.start_instant(granularity)?;
    let next = period_after(start, granularity).ok_or_else(|| TimeError::InvalidBinKey {
        key: key.0.clone(),
        granularity,
    })?;
    Ok(bin_key_of(next, granularity))
}

/// Human-readable label for the bin containing `instant`.
///
/// Any instant within one period yields the same label, so callers that
/// already hold an event instant can skip the reverse key parse.
pub fn display_label_of(instant: DateTime<Utc>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hour => instant.format("%b %d, %H:00").to_string(),
        Granularity::Day => instant.format("%b %d, %Y").to_string(),
        Granularity::Week => {
            let iso = iso_week_monday(instant.date_naive()).iso_week();
            format!("W{:02} {}", iso.week(), iso.year())
        }
        Granularity::Month => instant.format("%b %Y").to_string(),
    }
}

/// Human-readable label for an existing bin key.
pub fn display_label(key: &BinKey, granularity: Granularity) -> Result<String, TimeError> {
    key.start_instant(granularity)
        .map(|start| display_label_of(start, granularity))
}
