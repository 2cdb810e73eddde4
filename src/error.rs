//! Transport-boundary error types.
//!
//! These errors originate at the snapshot fetch and push channel seams.
//! They are recovered at the session boundary and exposed as retryable
//! state; they never reach the pure aggregation or forecast functions.

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Error reported by one of the two event transports.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The one-shot bulk snapshot fetch failed or returned non-success.
    /// The store keeps its last-known-good contents.
    #[error("snapshot fetch failed: {message}")]
    TransientFetch { message: String },

    /// The push channel reported an error payload or could not be
    /// subscribed. The store is left intact.
    #[error("stream error: {message}")]
    Stream { message: String },
}

impl TransportError {
    /// Create a snapshot-fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::TransientFetch {
            message: message.into(),
        }
    }

    /// Create a push-channel error.
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Whether an immediate retry of the same operation can succeed.
    /// Stream errors require a fresh subscription instead.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFetch { .. })
    }
}
