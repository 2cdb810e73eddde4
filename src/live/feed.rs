//! Transport seams for the snapshot fetch and the push stream.
//!
//! The concrete network transports live outside this crate; the engine
//! consumes them through these traits. A channel-backed feed ships here
//! for local development and tests.

use async_trait::async_trait;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::{TransportError, TransportResult};
use crate::models::event::RawPassageEvent;

/// One message on the push channel.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// Full snapshot, sent once on subscribe.
    Snapshot(Vec<RawPassageEvent>),
    /// A single newly produced event.
    Event(RawPassageEvent),
    /// Error payload reported by the channel.
    Error(String),
}

/// Push subscription for one producer domain.
///
/// On subscribe the server sends one full snapshot message, then a stream
/// of single new-event messages. Dropping the stream halts delivery.
#[async_trait]
pub trait PassageFeed: Send + Sync {
    async fn subscribe(&self) -> TransportResult<BoxStream<'static, FeedMessage>>;
}

/// One-shot bulk fetch of passage records for one producer domain.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> TransportResult<Vec<RawPassageEvent>>;
}

/// In-process feed backed by a bounded tokio channel.
///
/// The receiver is consumed by the first `subscribe`; a second
/// subscription on the same feed is a stream error.
pub struct ChannelFeed {
    receiver: Mutex<Option<mpsc::Receiver<FeedMessage>>>,
}

impl ChannelFeed {
    /// Create a feed and the sender half used to push messages into it.
    pub fn new(capacity: usize) -> (mpsc::Sender<FeedMessage>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            sender,
            ChannelFeed {
                receiver: Mutex::new(Some(receiver)),
            },
        )
    }
}

#[async_trait]
impl PassageFeed for ChannelFeed {
    async fn subscribe(&self) -> TransportResult<BoxStream<'static, FeedMessage>> {
        let mut receiver = self
            .receiver
            .lock()
            .take()
            .ok_or_else(|| TransportError::stream("channel feed already subscribed"))?;

        Ok(Box::pin(async_stream::stream! {
            while let Some(message) = receiver.recv().await {
                yield message;
            }
        }))
    }
}
