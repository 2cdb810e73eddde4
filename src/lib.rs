//! # TFA Rust Engine
//!
//! Session-resident traffic flow analytics engine.
//!
//! This crate converts a continuously growing, unordered collection of
//! timestamped vehicle-passage events — delivered as a one-time bulk
//! snapshot plus a live push stream — into time-bucketed aggregate series
//! at four granularities, with a short-horizon forecast and interactive
//! drill-down. All state lives in volatile session memory; transports,
//! chart rendering, and persistence are external collaborators.
//!
//! ## Features
//!
//! - **Bin Keys**: canonical, lexicographically sortable period keys with
//!   lossless reverse mapping and ISO-8601 week handling
//! - **Aggregation**: rectangular per-bin, per-category counts
//! - **Forecasting**: Holt's linear trend over the complete-bin prefix
//! - **Live/REST Merge**: id-keyed store absorbing snapshot and stream
//!   with last-applied-wins deduplication
//! - **Drill-down**: re-aggregation at the next-finer granularity inside
//!   one parent bin's time extent
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: consolidated public types and functions
//! - [`models`]: event, granularity, and bin-key primitives
//! - [`services`]: pure aggregation, completeness, forecast, and
//!   drill-down computations plus the series pipeline
//! - [`store`]: the per-session event store and merge semantics
//! - [`live`]: feed seams and the epoch-guarded live session
//!
//! ## Concurrency
//!
//! Every aggregation, forecast, and merge function is pure and
//! synchronous. The live session serializes store mutations on a single
//! absorption task; the full pipeline recomputes from scratch on every
//! dependency change rather than updating incrementally.

pub mod api;

pub mod config;
pub mod error;
pub mod models;

pub mod services;

pub mod store;

pub mod live;
