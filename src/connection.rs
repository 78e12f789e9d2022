//! The connection adapter: transport channel in, messaging contract out.
//!
//! A [`TcpConnection`] wraps an established [`MessageChannel`] plus a
//! [`CloseSignal`] and exposes the uniform [`Connection`] contract the
//! messaging layer consumes. It is a thin façade: writes go straight to the
//! channel, idle registrations go straight to its timer subsystem, and
//! `close` only completes the closure signal.

use crate::channel::{IdleCallback, IdleRegistration, MessageChannel};
use crate::close::{CloseListener, CloseSignal};
use crate::completion::{completion_future, CompletionFuture};
use crate::error::SendError;
use crate::message::Message;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tracing::{debug, trace};

/// Connection contract consumed by the messaging layer.
///
/// Implementations hide which network library sits underneath; callers only
/// see typed messages, inactivity notifications and a close operation.
pub trait Connection: Send + Sync {
    type Payload;
    type Error: Send + 'static;

    /// Submits one message for writing.
    ///
    /// The returned future resolves exactly once: success when the transport
    /// confirms the write left the send buffer (remote delivery is whatever
    /// the transport guarantees, nothing more), failure carrying the
    /// transport's own cause. Never blocks the caller. No ordering promise
    /// is made across concurrent sends; callers needing strict order await
    /// each future before issuing the next.
    fn send(&self, message: Message<Self::Payload>) -> SendFuture<Self::Error>;

    /// Asks the transport to fire `callback` whenever no read activity has
    /// been seen for `window`, repeatedly, once per elapsed window.
    /// Re-registration semantics are delegated to the channel.
    fn on_read_inactivity(&self, window: Duration, callback: IdleCallback);

    /// Same as [`on_read_inactivity`](Connection::on_read_inactivity), for
    /// the write direction.
    fn on_write_inactivity(&self, window: Duration, callback: IdleCallback);

    /// Completes the connection's closure signal. Idempotent. Does not
    /// cancel in-flight writes and does not tear down the channel; it only
    /// notifies everyone waiting on the signal.
    fn close(&self);
}

/// [`Connection`] over an established TCP channel.
///
/// Constructed by whatever establishes the connection (a client or a
/// listener); this type never dials or accepts by itself. The closure
/// signal is deliberately separate from the channel's own end-of-stream so
/// "asked to shut down" and "stream ended" stay independently observable.
pub struct TcpConnection<C> {
    channel: C,
    close: CloseSignal,
}

impl<C: MessageChannel> TcpConnection<C> {
    pub fn new(channel: C, close: CloseSignal) -> Self {
        Self { channel, close }
    }

    /// Listener for the closure signal. Resolves for `close` calls made
    /// before or after the listener was taken.
    pub fn closed(&self) -> CloseListener {
        self.close.listen()
    }

    pub fn is_closed(&self) -> bool {
        self.close.is_complete()
    }
}

impl<C: MessageChannel> Connection for TcpConnection<C> {
    type Payload = C::Payload;
    type Error = C::Error;

    fn send(&self, message: Message<C::Payload>) -> SendFuture<C::Error> {
        if self.close.is_complete() {
            trace!("send rejected, connection already closed");
            return SendFuture::rejected();
        }
        trace!("submitting message to channel write path");
        let write = self.channel.write(vec![message]);
        SendFuture::writing(completion_future(write))
    }

    fn on_read_inactivity(&self, window: Duration, callback: IdleCallback) {
        self.channel
            .register_idle(IdleRegistration::read(window, callback));
    }

    fn on_write_inactivity(&self, window: Duration, callback: IdleCallback) {
        self.channel
            .register_idle(IdleRegistration::write(window, callback));
    }

    fn close(&self) {
        debug!("connection close requested");
        self.close.complete();
    }
}

enum SendFutureKind<E> {
    /// Bridged write completion from the channel.
    Writing(CompletionFuture<(), E>),
    /// Failed before submission; resolves immediately.
    Rejected(Option<SendError<E>>),
}

/// Future returned by [`Connection::send`]. Resolves exactly once; there is
/// no way to cancel the underlying write.
pub struct SendFuture<E> {
    kind: SendFutureKind<E>,
}

impl<E> SendFuture<E> {
    fn writing(inner: CompletionFuture<(), E>) -> Self {
        Self {
            kind: SendFutureKind::Writing(inner),
        }
    }

    fn rejected() -> Self {
        Self {
            kind: SendFutureKind::Rejected(Some(SendError::Closed)),
        }
    }
}

impl<E: Send + Unpin> Future for SendFuture<E> {
    type Output = Result<(), SendError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().kind {
            SendFutureKind::Writing(inner) => Pin::new(inner)
                .poll(cx)
                .map(|outcome| outcome.map_err(SendError::Transport)),
            SendFutureKind::Rejected(error) => match error.take() {
                Some(error) => Poll::Ready(Err(error)),
                None => panic!("SendFuture polled after completion"),
            },
        }
    }
}
