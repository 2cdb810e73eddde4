//! Live data boundary: feed seams and the epoch-guarded session.
//!
//! Concrete transports (the bulk fetch and the push subscription) live
//! outside this crate. The session consumes them through the trait seams
//! in [`feed`], recovers transport errors into retryable state, and keeps
//! the pure service layer free of I/O concerns.

pub mod feed;
pub mod session;

pub use feed::{ChannelFeed, FeedMessage, PassageFeed, SnapshotSource};
pub use session::{LiveSession, SessionStatus};
