//! Contracts the underlying transport channel must provide.
//!
//! Concrete bindings (socket handling, framing, encoding) live with the
//! transports; this module only pins down the seam the connection adapter
//! consumes: submit messages for writing, and forward idle-timeout
//! registrations to the transport's timer subsystem.

use crate::completion::CompletionSource;
use crate::message::Message;
use std::fmt;
use std::time::Duration;

/// Direction of inactivity watched by an [`IdleRegistration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleDirection {
    Read,
    Write,
}

/// Callback fired by the transport's timer subsystem. May fire once per
/// elapsed idle window, repeatedly, until the connection goes away.
pub type IdleCallback = Box<dyn Fn() + Send + Sync>;

/// An idle-timeout subscription: a direction, an inactivity window and the
/// callback to fire when the window elapses with no activity.
///
/// Once handed to [`MessageChannel::register_idle`] its lifetime belongs to
/// the channel's timer subsystem; the connection adapter keeps no record of
/// active registrations.
pub struct IdleRegistration {
    direction: IdleDirection,
    window: Duration,
    callback: IdleCallback,
}

impl IdleRegistration {
    /// Subscription for the read direction: fires after `window` with no
    /// read activity.
    pub fn read(window: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new(IdleDirection::Read, window, callback)
    }

    /// Subscription for the write direction: fires after `window` with no
    /// write activity.
    pub fn write(window: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new(IdleDirection::Write, window, callback)
    }

    fn new(
        direction: IdleDirection,
        window: Duration,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            direction,
            window,
            callback: Box::new(callback),
        }
    }

    pub fn direction(&self) -> IdleDirection {
        self.direction
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Fires the callback. Invoked by the timer subsystem each time the
    /// window elapses without activity.
    pub fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for IdleRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleRegistration")
            .field("direction", &self.direction)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// Write and idle-timer capability of one established transport channel.
///
/// All methods take `&self`; implementations must tolerate concurrent write
/// submissions (the connection adapter adds no serialization of its own,
/// and makes no ordering promise across concurrent submissions beyond the
/// channel's).
pub trait MessageChannel: Send + Sync {
    /// Payload type of messages written to the stream.
    type Payload;
    /// Error the transport reports for a failed write.
    type Error: Send + 'static;
    /// Native completion style for one write submission.
    type Write: CompletionSource<Value = (), Error = Self::Error>;

    /// Submits a sequence of messages for writing and returns one completion
    /// source for the whole submission.
    fn write(&self, messages: Vec<Message<Self::Payload>>) -> Self::Write;

    /// Forwards an idle-timeout registration to the transport's timer
    /// subsystem. Whether a later registration for the same direction
    /// replaces or stacks is the channel's call.
    fn register_idle(&self, registration: IdleRegistration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn read_registration_keeps_direction_and_window() {
        let registration = IdleRegistration::read(Duration::from_millis(500), || {});

        assert_eq!(registration.direction(), IdleDirection::Read);
        assert_eq!(registration.window(), Duration::from_millis(500));
    }

    #[test]
    fn write_registration_keeps_direction_and_window() {
        let registration = IdleRegistration::write(Duration::from_secs(2), || {});

        assert_eq!(registration.direction(), IdleDirection::Write);
        assert_eq!(registration.window(), Duration::from_secs(2));
    }

    #[test]
    fn invoke_fires_the_callback_each_time() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let registration =
            IdleRegistration::write(Duration::from_millis(500), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        registration.invoke();
        registration.invoke();
        registration.invoke();

        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }
}
