//! Connection adapter for typed messaging over TCP.
//!
//! Sits between a messaging layer and a byte-oriented transport. The
//! transport hands over an established channel (message writes plus idle
//! timers, see [`MessageChannel`]) and a [`CloseSignal`]; the adapter
//! exposes the uniform [`Connection`] contract the messaging layer
//! consumes ([`send`](Connection::send), read/write inactivity callbacks,
//! [`close`](Connection::close)) regardless of which network library is
//! underneath. Write completions are translated from the transport's
//! native single-shot notification style into plain futures by
//! [`completion_future`].
//!
//! Framing, serialization, connection establishment, pooling and reconnect
//! policy all live with the transport or the caller, not here.

pub mod channel;
pub mod close;
pub mod completion;
pub mod connection;
pub mod error;
pub mod message;

pub use channel::{IdleCallback, IdleDirection, IdleRegistration, MessageChannel};
pub use close::{CloseListener, CloseSignal};
pub use completion::{completion_future, CompletionFuture, CompletionListener, CompletionSource};
pub use connection::{Connection, SendFuture, TcpConnection};
pub use error::SendError;
pub use message::{Message, MessageHeaders};
