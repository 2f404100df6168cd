//! # wsclient
//!
//! A small WebSocket client wrapper for Rust.
//!
//! `wsclient` builds endpoint URLs from configuration, exposes connect as an
//! awaitable operation, and republishes the socket's lifecycle events
//! (connect, message, disconnect, error) on a notification bus.
//!
//! ## Features
//!
//! - **URL Building**: `ws`/`wss` socket and `http`/`https` companion URLs
//! - **Single-shot Connect**: resolves on open, rejects on the first close or error
//! - **Notification Bus**: `on`/`once`/`off` subscriptions with explicit handles
//! - **Ambient Origin**: `secure` defaults to the hosting page's protocol
//! - **Pluggable Transport**: tokio-tungstenite by default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsclient::{EventKind, Notification, WebSocketClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = WebSocketClient::builder().host("127.0.0.1").port(9000).build();
//!     client.on(EventKind::Disconnect, |n| {
//!         if let Notification::Disconnect { code, reason, .. } = n {
//!             println!("closed: {} {}", code, reason);
//!         }
//!     });
//!     client.connect().await.unwrap();
//!     client.send_text("hello").unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and socket ready states
//! - [`bus`] - Notification bus
//! - [`client`] - The client wrapper
//! - [`config`] - Connection options and URL construction
//! - [`origin`] - Ambient origin detection
//! - [`ws`] - Socket handle, native events and transports

pub mod base;
pub mod bus;
pub mod client;
pub mod config;
pub mod origin;
pub mod ws;

pub use base::neterror::NetError;
pub use base::readystate::ReadyState;
pub use bus::{EventKind, Notification, NotificationBus, SubscriptionId};
pub use client::{ClientBuilder, ClientId, ConnectError, WebSocketClient};
pub use config::{ConnectionConfig, ConnectionOptions};
