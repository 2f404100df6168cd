//! Native socket lifecycle events.
//!
//! These are the raw events a transport delivers to a [`SocketHandle`]:
//! opened, message, closed and errored. The client republishes them on its
//! notification bus.
//!
//! [`SocketHandle`]: super::socket::SocketHandle

use bytes::Bytes;
use std::fmt;
use url::Url;

/// How binary frames are surfaced to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryType {
    /// Opaque blob handle.
    #[default]
    Blob,
    /// Raw byte buffer.
    ArrayBuffer,
}

/// Opaque binary payload, delivered when the socket uses [`BinaryType::Blob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob(Bytes);

impl Blob {
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Read the whole blob.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Payload of a received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageData {
    Text(String),
    Binary(Bytes),
    Blob(Blob),
}

impl MessageData {
    /// Wrap a binary frame according to `binary_type`.
    pub fn binary(data: Bytes, binary_type: BinaryType) -> Self {
        match binary_type {
            BinaryType::ArrayBuffer => MessageData::Binary(data),
            BinaryType::Blob => MessageData::Blob(Blob(data)),
        }
    }

    /// True only for raw byte buffers.
    pub fn is_binary(&self) -> bool {
        matches!(self, MessageData::Binary(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MessageData::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// The socket finished its opening handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEvent {
    pub url: Url,
}

/// A data frame arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub data: MessageData,
    /// Origin of the sender, `scheme://host[:port]`.
    pub origin: String,
}

/// The socket reached the closed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub code: u16,
    pub reason: String,
    /// Whether the closing handshake completed.
    pub was_clean: bool,
}

/// A transport failure. It may or may not be followed by a close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Any native lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    Open(OpenEvent),
    Message(MessageEvent),
    Close(CloseEvent),
    Error(ErrorEvent),
}

impl fmt::Display for NativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeEvent::Open(e) => write!(f, "open ({})", e.url),
            NativeEvent::Message(e) => write!(f, "message from {}", e.origin),
            NativeEvent::Close(e) if e.reason.is_empty() => write!(f, "close (code {})", e.code),
            NativeEvent::Close(e) => write!(f, "close (code {}: {})", e.code, e.reason),
            NativeEvent::Error(e) => write!(f, "error ({})", e.message),
        }
    }
}
