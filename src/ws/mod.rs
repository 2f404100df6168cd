//! WebSocket socket layer.
//!
//! Models a browser-style socket: a handle with a ready state, a binary
//! type and four native lifecycle events, driven by a pluggable transport.
//!
//! # Example
//! ```ignore
//! use wsclient::ws::{NativeListeners, SocketHandle, Transport, TungsteniteTransport};
//!
//! let (handle, driver) = SocketHandle::new(url);
//! handle.add_listeners(NativeListeners::new().on_open(|e| println!("open {}", e.url)));
//! TungsteniteTransport.start(driver);
//! ```

mod event;
mod message;
mod socket;
mod transport;

pub use event::{
    BinaryType, Blob, CloseEvent, ErrorEvent, MessageData, MessageEvent, NativeEvent, OpenEvent,
};
pub use message::{CloseCode, CloseFrame, Message};
pub use socket::{NativeListeners, SocketDriver, SocketHandle};
pub use transport::{Transport, TungsteniteTransport};
