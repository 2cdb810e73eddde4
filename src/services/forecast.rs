//! One-period-ahead forecasting with Holt's linear trend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::AggregatedBin;
use super::completeness::is_incomplete;
use crate::models::granularity::Granularity;
use crate::models::time::{bin_key_of, display_label_of, period_after, BinKey};

/// Level smoothing coefficient.
pub const HOLT_ALPHA: f64 = 0.5;
/// Trend smoothing coefficient.
pub const HOLT_BETA: f64 = 0.5;

/// Synthetic bin extrapolated one period past the observed series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastBin {
    pub bin_key: BinKey,
    pub display_label: String,
    pub counts: BTreeMap<String, u64>,
}

/// Holt's linear trend: one-step-ahead extrapolation of `series`.
///
/// level₁ = s₁, trend₁ = s₂ − s₁; for t in 2..n:
/// levelₜ = α·sₜ + (1−α)·(levelₜ₋₁ + trendₜ₋₁),
/// trendₜ = β·(levelₜ − levelₜ₋₁) + (1−β)·trendₜ₋₁.
/// Returns levelₙ + trendₙ, or `None` for fewer than two samples.
pub(crate) fn holt_linear(series: &[f64], alpha: f64, beta: f64) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }

    let mut level = series[0];
    let mut trend = series[1] - series[0];
    for &sample in &series[1..] {
        let previous_level = level;
        level = alpha * sample + (1.0 - alpha) * (level + trend);
        trend = beta * (level - previous_level) + (1.0 - beta) * trend;
    }
    Some(level + trend)
}

/// Forecast the next not-yet-started bin from an aggregated series.
///
/// Incomplete bins are discarded before fitting — an in-progress bucket
/// biases the trend low. Fewer than two complete bins yields `None`
/// (forecast unavailable is a normal result, not an error). The target
/// bin starts at the successor of the last complete bin and advances past
/// any period still open at `now`.
pub fn forecast(
    bins: &[AggregatedBin],
    granularity: Granularity,
    categories: &[String],
    now: DateTime<Utc>,
) -> Option<ForecastBin> {
    let complete: Vec<&AggregatedBin> = bins
        .iter()
        .filter(|bin| !is_incomplete(&bin.bin_key, granularity, now))
        .collect();
    if complete.len() < 2 {
        return None;
    }

    let mut counts = BTreeMap::new();
    for category in categories {
        let series: Vec<f64> = complete
            .iter()
            .map(|bin| bin.counts.get(category).copied().unwrap_or(0) as f64)
            .collect();
        let predicted = holt_linear(&series, HOLT_ALPHA, HOLT_BETA).unwrap_or(0.0);
        counts.insert(category.clone(), predicted.round().max(0.0) as u64);
    }

    let last = complete.last()?;
    let mut instant = match last.bin_key.start_instant(granularity) {
        Ok(start) => start,
        Err(e) => {
            log::warn!("forecast skipped: {}", e);
            return None;
        }
    };

    // Walk forward until the candidate period has not yet started, so the
    // forecast never lands on a bucket already partially filled.
    loop {
        instant = match period_after(instant, granularity) {
            Some(next) => next,
            None => {
                log::warn!("forecast skipped: calendar overflow past {}", instant);
                return None;
            }
        };
        let bin_key = bin_key_of(instant, granularity);
        if !is_incomplete(&bin_key, granularity, now) {
            return Some(ForecastBin {
                display_label: display_label_of(instant, granularity),
                bin_key,
                counts,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::{forecast, holt_linear, HOLT_ALPHA, HOLT_BETA};
    use crate::models::granularity::Granularity;
    use crate::models::time::BinKey;
    use crate::services::aggregate::AggregatedBin;

    fn create_test_bin(key: &str, label: &str, counts: &[(&str, u64)]) -> AggregatedBin {
        AggregatedBin {
            bin_key: BinKey::new(key),
            display_label: label.to_string(),
            counts: counts
                .iter()
                .map(|(category, count)| (category.to_string(), *count))
                .collect(),
        }
    }

    fn daily_car_series() -> Vec<AggregatedBin> {
        vec![
            create_test_bin("2025-01-01", "Jan 01, 2025", &[("car", 10)]),
            create_test_bin("2025-01-02", "Jan 02, 2025", &[("car", 12)]),
            create_test_bin("2025-01-03", "Jan 03, 2025", &[("car", 14)]),
            create_test_bin("2025-01-04", "Jan 04, 2025", &[("car", 16)]),
            create_test_bin("2025-01-05", "Jan 05, 2025", &[("car", 18)]),
        ]
    }

    #[test]
    fn test_holt_linear_steady_trend() {
        let series = [10.0, 12.0, 14.0, 16.0, 18.0];
        let predicted = holt_linear(&series, HOLT_ALPHA, HOLT_BETA).unwrap();
        assert!((predicted - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_holt_linear_constant_series() {
        let series = [5.0, 5.0, 5.0, 5.0];
        let predicted = holt_linear(&series, HOLT_ALPHA, HOLT_BETA).unwrap();
        assert!((predicted - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_holt_linear_too_short() {
        assert!(holt_linear(&[], HOLT_ALPHA, HOLT_BETA).is_none());
        assert!(holt_linear(&[7.0], HOLT_ALPHA, HOLT_BETA).is_none());
    }

    #[test]
    fn test_forecast_linear_car_scenario() {
        // Complete daily bins Jan 1..5 with counts 10,12,14,16,18; the
        // fitted level is 18 and trend 2, so the projection is 20.
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        let bins = daily_car_series();
        let result = forecast(&bins, Granularity::Day, &["car".to_string()], now).unwrap();

        assert_eq!(result.counts["car"], 20);
        // Jan 6 is still open at `now`, so the target advances to Jan 7.
        assert_eq!(result.bin_key.as_str(), "2025-01-07");
        assert_eq!(result.display_label, "Jan 07, 2025");
    }

    #[test]
    fn test_forecast_targets_successor_when_now_is_later() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap();
        let bins = daily_car_series();
        let result = forecast(&bins, Granularity::Day, &["car".to_string()], now).unwrap();
        assert_eq!(result.bin_key.as_str(), "2025-01-06");
    }

    #[test]
    fn test_forecast_discards_incomplete_bin_before_fitting() {
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        let mut bins = daily_car_series();
        // Today's partial bucket would drag the trend down if it were fit.
        bins.push(create_test_bin("2025-01-06", "Jan 06, 2025", &[("car", 3)]));

        let result = forecast(&bins, Granularity::Day, &["car".to_string()], now).unwrap();
        assert_eq!(result.counts["car"], 20);
        assert_eq!(result.bin_key.as_str(), "2025-01-07");
    }

    #[test]
    fn test_forecast_requires_two_complete_bins() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();
        // One complete bin (Jan 1) plus the open Jan 2 bucket.
        let bins = vec![
            create_test_bin("2025-01-01", "Jan 01, 2025", &[("car", 10)]),
            create_test_bin("2025-01-02", "Jan 02, 2025", &[("car", 4)]),
        ];
        assert!(forecast(&bins, Granularity::Day, &["car".to_string()], now).is_none());
    }

    #[test]
    fn test_forecast_empty_series() {
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        assert!(forecast(&[], Granularity::Day, &["car".to_string()], now).is_none());
    }

    #[test]
    fn test_forecast_clamps_declining_trend_to_zero() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let bins = vec![
            create_test_bin("2025-01-01", "Jan 01, 2025", &[("car", 10)]),
            create_test_bin("2025-01-02", "Jan 02, 2025", &[("car", 5)]),
        ];
        let result = forecast(&bins, Granularity::Day, &["car".to_string()], now).unwrap();
        assert_eq!(result.counts["car"], 0);
    }

    #[test]
    fn test_forecast_counts_are_per_requested_category() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let bins = vec![
            create_test_bin("2025-01-01", "Jan 01, 2025", &[("car", 10), ("truck", 2)]),
            create_test_bin("2025-01-02", "Jan 02, 2025", &[("car", 12), ("truck", 2)]),
            create_test_bin("2025-01-03", "Jan 03, 2025", &[("car", 14), ("truck", 2)]),
        ];
        let categories = vec!["car".to_string(), "truck".to_string()];
        let result = forecast(&bins, Granularity::Day, &categories, now).unwrap();

        assert_eq!(result.counts.len(), 2);
        assert_eq!(result.counts["car"], 16);
        assert_eq!(result.counts["truck"], 2);
    }

    #[test]
    fn test_forecast_month_granularity_target() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let bins = vec![
            create_test_bin("2025-01", "Jan 2025", &[("car", 100)]),
            create_test_bin("2025-02", "Feb 2025", &[("car", 110)]),
            // March is still open and must be excluded from the fit.
            create_test_bin("2025-03", "Mar 2025", &[("car", 40)]),
        ];
        let result = forecast(&bins, Granularity::Month, &["car".to_string()], now).unwrap();
        assert_eq!(result.bin_key.as_str(), "2025-04");
        assert_eq!(result.counts["car"], 120);
        assert_eq!(result.display_label, "Apr 2025");
    }
}
