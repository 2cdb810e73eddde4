//! Service layer: the pure analytics computations.
//!
//! Every function in this module is synchronous and total over
//! well-formed input; transport failures are handled at the [`crate::live`]
//! boundary and never reach this layer.

pub mod aggregate;

pub mod completeness;

pub mod drilldown;

pub mod forecast;

pub mod pipeline;

pub use aggregate::{aggregate, filter_events, AggregatedBin};
pub use completeness::{is_incomplete, is_incomplete_now};
pub use drilldown::drill_down;
pub use forecast::{forecast, ForecastBin, HOLT_ALPHA, HOLT_BETA};
pub use pipeline::{build_series, SeriesQuery, SeriesView};
