//! Errors surfaced on the send path.

use thiserror::Error;

/// Why a send future failed.
///
/// Transport causes are carried by value, untouched, so callers can match
/// on or downcast the original error. Nothing is retried here; a failed
/// send leaves the connection open and the caller decides what to do next.
#[derive(Debug, Error)]
pub enum SendError<E> {
    /// The channel could not complete the submitted write.
    #[error(transparent)]
    Transport(E),

    /// The connection was already closed when the send was attempted.
    #[error("connection closed")]
    Closed,
}

impl<E> SendError<E> {
    /// The transport cause, if this was a write failure.
    pub fn into_transport(self) -> Option<E> {
        match self {
            SendError::Transport(cause) => Some(cause),
            SendError::Closed => None,
        }
    }
}
