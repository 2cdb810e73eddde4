//! Session-resident storage for merged passage events.
//!
//! The store absorbs two concurrently updating legs — the one-time bulk
//! snapshot and the live push stream — into one deduplicated working set:
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐
//! │ bulk snapshot│      │ push stream  │
//! └──────┬───────┘      └──────┬───────┘
//!        │  insert-or-replace  │
//!        ▼       per id        ▼
//! ┌─────────────────────────────────────┐
//! │ EventStore (id → PassageEvent map)  │
//! └──────────────────┬──────────────────┘
//!                    ▼ merged_events()
//!            aggregation pipeline
//! ```
//!
//! All contents are volatile; the store dies with the session.

pub mod checksum;
pub mod event_store;

pub use checksum::events_fingerprint;
pub use event_store::EventStore;
