//! Bridges the transport's native completion style into a generic future.
//!
//! Event-driven transports report the outcome of a write by firing a
//! listener exactly once. Callers above the connection layer want a plain
//! [`Future`] instead. [`completion_future`] is the single translation point
//! between the two styles: it subscribes to the upstream source and hands
//! back a future that mirrors the upstream outcome exactly. Same
//! success/failure split, same error value, no retries, no transformation.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// Listener invoked exactly once with the outcome of a completion source.
pub type CompletionListener<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

/// A single-shot asynchronous result producer, in the transport's native
/// notification style.
///
/// The transport must invoke the listener at most once. If it never does,
/// the bridged future simply stays pending, mirroring the upstream.
pub trait CompletionSource {
    type Value: Send + 'static;
    type Error: Send + 'static;

    fn subscribe(self, listener: CompletionListener<Self::Value, Self::Error>);
}

enum State<T, E> {
    /// Upstream has not fired yet; the waker of the most recent poll is
    /// parked here.
    Pending { waker: Option<Waker> },
    Succeeded(T),
    Failed(E),
    /// The outcome was already handed out by `poll`.
    Finished,
}

/// Generic single-shot future produced by [`completion_future`].
///
/// Resolves exactly once, to the upstream's own outcome. Both terminal
/// states are final.
pub struct CompletionFuture<T, E> {
    state: Arc<Mutex<State<T, E>>>,
}

/// Subscribes to `source` and returns a future mirroring its outcome.
pub fn completion_future<S: CompletionSource>(source: S) -> CompletionFuture<S::Value, S::Error> {
    let state = Arc::new(Mutex::new(State::Pending { waker: None }));
    let shared = Arc::clone(&state);

    source.subscribe(Box::new(move |outcome| {
        let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let settled = match outcome {
            Ok(value) => State::Succeeded(value),
            Err(error) => State::Failed(error),
        };
        if let State::Pending { waker: Some(waker) } = std::mem::replace(&mut *state, settled) {
            waker.wake();
        }
    }));

    CompletionFuture { state }
}

impl<T, E> Future for CompletionFuture<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *state, State::Finished) {
            State::Pending { .. } => {
                *state = State::Pending {
                    waker: Some(cx.waker().clone()),
                };
                Poll::Pending
            }
            State::Succeeded(value) => Poll::Ready(Ok(value)),
            State::Failed(error) => Poll::Ready(Err(error)),
            State::Finished => panic!("CompletionFuture polled after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tokio_test::{assert_pending, assert_ready, task};

    type Slot<T, E> = Arc<Mutex<Option<CompletionListener<T, E>>>>;

    /// Completion source fired by hand from the test body.
    struct ManualSource<T, E> {
        slot: Slot<T, E>,
    }

    impl<T: Send + 'static, E: Send + 'static> CompletionSource for ManualSource<T, E> {
        type Value = T;
        type Error = E;

        fn subscribe(self, listener: CompletionListener<T, E>) {
            *self.slot.lock().unwrap() = Some(listener);
        }
    }

    fn manual_source<T: Send + 'static, E: Send + 'static>() -> (ManualSource<T, E>, Slot<T, E>) {
        let slot: Slot<T, E> = Arc::new(Mutex::new(None));
        (ManualSource { slot: slot.clone() }, slot)
    }

    fn fire<T, E>(slot: &Slot<T, E>, outcome: Result<T, E>) {
        let listener = slot.lock().unwrap().take().expect("listener not subscribed");
        listener(outcome);
    }

    #[test]
    fn pending_until_upstream_fires_then_succeeds() {
        let (source, slot) = manual_source::<u32, io::Error>();
        let mut future = task::spawn(completion_future(source));

        assert_pending!(future.poll());
        assert_pending!(future.poll());

        fire(&slot, Ok(7));
        assert!(future.is_woken());
        assert_eq!(assert_ready!(future.poll()).unwrap(), 7);
    }

    #[test]
    fn upstream_failure_passes_the_error_through() {
        let (source, slot) = manual_source::<(), io::Error>();
        let mut future = task::spawn(completion_future(source));

        assert_pending!(future.poll());
        fire(
            &slot,
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
        );

        let error = assert_ready!(future.poll()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(error.to_string(), "reset by peer");
    }

    #[test]
    fn outcome_delivered_before_first_poll_is_ready_immediately() {
        let (source, slot) = manual_source::<u32, io::Error>();
        let mut future = task::spawn(completion_future(source));

        fire(&slot, Ok(42));
        assert_eq!(assert_ready!(future.poll()).unwrap(), 42);
    }

    #[test]
    fn silent_upstream_leaves_the_future_pending() {
        let (source, _slot) = manual_source::<(), io::Error>();
        let mut future = task::spawn(completion_future(source));

        assert_pending!(future.poll());
        assert_pending!(future.poll());
        assert!(!future.is_woken());
    }
}
