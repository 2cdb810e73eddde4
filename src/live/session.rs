//! Live session: owns the event store, absorbs both feed legs, and
//! guards teardown with a generation epoch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::feed::{FeedMessage, PassageFeed, SnapshotSource};
use crate::error::{TransportError, TransportResult};
use crate::models::event::{sanitize_raw, PassageEvent};
use crate::store::EventStore;

/// Connection state surfaced to the embedding view.
///
/// Transport failures land here as retryable state; they never mutate
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Live,
    Error(String),
}

/// Per-session owner of the event store and the push subscription.
///
/// All store mutations run on the single absorption task (or the caller's
/// task for the one-shot snapshot load), each as a whole-map upsert under
/// a short write guard, so writers cannot interleave mid-update.
pub struct LiveSession {
    store: Arc<RwLock<EventStore>>,
    status: Arc<RwLock<SessionStatus>>,
    epoch: Arc<AtomicU64>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl LiveSession {
    pub fn new() -> Self {
        LiveSession {
            store: Arc::new(RwLock::new(EventStore::new())),
            status: Arc::new(RwLock::new(SessionStatus::Idle)),
            epoch: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Shared handle to the session store.
    pub fn store(&self) -> Arc<RwLock<EventStore>> {
        Arc::clone(&self.store)
    }

    pub fn status(&self) -> SessionStatus {
        self.status.read().clone()
    }

    /// Deduplicated working set for the aggregation pipeline.
    pub fn merged_events(&self) -> Vec<PassageEvent> {
        self.store.read().merged_events()
    }

    /// One-shot bulk load. A failed fetch records a retryable error state
    /// and leaves the store at its last-known-good contents.
    pub async fn load_snapshot(&self, source: &dyn SnapshotSource) -> TransportResult<usize> {
        match source.fetch_snapshot().await {
            Ok(raw) => {
                let events = sanitize_raw(raw);
                let absorbed = events.len();
                self.store.write().absorb_snapshot(events);
                let mut status = self.status.write();
                if matches!(*status, SessionStatus::Error(_)) {
                    *status = SessionStatus::Idle;
                }
                log::info!("bulk snapshot absorbed: {} event(s)", absorbed);
                Ok(absorbed)
            }
            Err(e) => {
                log::warn!("bulk snapshot fetch failed: {}", e);
                *self.status.write() = SessionStatus::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Subscribe to the push feed and start the absorption task.
    ///
    /// Supersedes any previous subscription: the old task's epoch becomes
    /// stale, so a message racing the switch is discarded, not applied.
    pub async fn connect(&self, feed: Arc<dyn PassageFeed>) -> TransportResult<()> {
        self.disconnect();
        let epoch = self.epoch.load(Ordering::SeqCst);

        let mut stream = match feed.subscribe().await {
            Ok(stream) => stream,
            Err(e) => {
                *self.status.write() = SessionStatus::Error(e.to_string());
                return Err(e);
            }
        };
        *self.status.write() = SessionStatus::Live;

        let store = Arc::clone(&self.store);
        let status = Arc::clone(&self.status);
        let current_epoch = Arc::clone(&self.epoch);

        let handle = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                // A message racing teardown observes a stale epoch.
                if current_epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                match message {
                    FeedMessage::Snapshot(raw) => {
                        let events = sanitize_raw(raw);
                        store.write().absorb_snapshot(events);
                    }
                    FeedMessage::Event(raw) => match raw.validate() {
                        Some(event) => store.write().absorb_stream_event(event),
                        None => log::warn!("dropped malformed streamed passage record"),
                    },
                    FeedMessage::Error(message) => {
                        let error = TransportError::stream(message);
                        log::warn!("push channel reported: {}", error);
                        *status.write() = SessionStatus::Error(error.to_string());
                    }
                }
            }
        });
        *self.task.lock() = Some(handle);
        Ok(())
    }

    /// Tear down the subscription.
    ///
    /// Bumping the epoch first makes any in-flight callback observe a
    /// stale generation and discard its message rather than apply it.
    pub fn disconnect(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        let mut status = self.status.write();
        if *status == SessionStatus::Live {
            *status = SessionStatus::Idle;
        }
    }
}

impl Default for LiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}
