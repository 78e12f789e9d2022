//! One-shot, multi-waiter closure signal.
//!
//! Kept separate from the transport's own end-of-stream notification:
//! completing this signal means "the connection was asked to shut down",
//! which higher layers may want to observe independently of network-level
//! stream termination arriving on its own schedule.

use std::sync::Arc;
use tokio::sync::watch;

/// Broadcast-once latch recording shutdown intent for one connection.
///
/// Completion is monotonic: once completed the signal stays completed, and
/// repeated [`complete`](CloseSignal::complete) calls are not observable as
/// new events. Any number of [`CloseListener`]s may await it, before or
/// after completion.
#[derive(Debug, Clone)]
pub struct CloseSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Completes the signal. Idempotent; only the first call notifies.
    pub fn complete(&self) {
        self.tx.send_if_modified(|closed| {
            let first = !*closed;
            *closed = true;
            first
        });
    }

    pub fn is_complete(&self) -> bool {
        *self.tx.borrow()
    }

    /// Hands out a listener for this signal.
    pub fn listen(&self) -> CloseListener {
        CloseListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CloseSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaits completion of a [`CloseSignal`].
#[derive(Debug, Clone)]
pub struct CloseListener {
    rx: watch::Receiver<bool>,
}

impl CloseListener {
    /// Resolves once the signal has completed. Also resolves if every handle
    /// to the signal is dropped without completing it, since nothing is left
    /// to wait for in that case.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|closed| *closed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn listener_registered_before_completion_is_notified() {
        let signal = CloseSignal::new();
        let mut waiter = task::spawn(signal.listen().wait());

        assert_pending!(waiter.poll());
        signal.complete();

        assert!(waiter.is_woken());
        assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn listener_registered_after_completion_sees_it_completed() {
        let signal = CloseSignal::new();
        signal.complete();

        assert!(signal.is_complete());
        signal.listen().wait().await;
    }

    #[test]
    fn completion_satisfies_every_listener() {
        let signal = CloseSignal::new();
        let mut waiters = task::spawn(join(signal.listen().wait(), signal.listen().wait()));

        assert_pending!(waiters.poll());
        signal.complete();

        assert!(waiters.is_woken());
        assert_ready!(waiters.poll());
    }

    #[tokio::test]
    async fn repeated_completion_is_quiet() {
        let signal = CloseSignal::new();
        signal.complete();
        signal.complete();

        assert!(signal.is_complete());
        signal.listen().wait().await;
    }

    #[tokio::test]
    async fn dropping_the_signal_releases_waiters() {
        let signal = CloseSignal::new();
        let listener = signal.listen();
        drop(signal);

        listener.wait().await;
    }
}
