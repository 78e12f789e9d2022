//! Generic message envelope carried through the connection layer.

use std::collections::HashMap;

/// String key/value metadata attached to a [`Message`].
///
/// The connection layer never inspects headers; they travel with the payload
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeaders {
    entries: HashMap<String, String>,
}

impl MessageHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, returning the previous value for that name if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A typed message: a payload of type `P` plus headers.
///
/// Opaque to the connection adapter, which submits it to the transport
/// exactly as given. Payload encoding is the transport's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<P> {
    payload: P,
    headers: MessageHeaders,
}

impl<P> Message<P> {
    /// Creates a message with empty headers.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            headers: MessageHeaders::new(),
        }
    }

    pub fn with_headers(payload: P, headers: MessageHeaders) -> Self {
        Self { payload, headers }
    }

    /// Adds a header, builder style.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub fn into_parts(self) -> (P, MessageHeaders) {
        (self.payload, self.headers)
    }
}
