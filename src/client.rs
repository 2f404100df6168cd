//! WebSocket client with lifecycle notifications.
//!
//! [`WebSocketClient`] owns at most one socket at a time. It builds its
//! endpoint URLs from a [`ConnectionConfig`], connects with a single-shot
//! awaitable, and republishes the socket's native events on its
//! [`NotificationBus`].
//!
//! # Example
//!
//! ```rust,ignore
//! use wsclient::{EventKind, Notification, WebSocketClient};
//!
//! let client = WebSocketClient::builder()
//!     .host("127.0.0.1")
//!     .port(9000)
//!     .build();
//!
//! client.on(EventKind::Message, |n| {
//!     if let Notification::Message { data, is_binary, .. } = n {
//!         println!("{:?} (binary: {})", data, is_binary);
//!     }
//! });
//!
//! assert!(client.connect().await?);
//! client.send_text("hello")?;
//! ```

use crate::base::neterror::NetError;
use crate::base::readystate::ReadyState;
use crate::bus::{EventKind, Notification, NotificationBus, SubscriptionId};
use crate::config::{ConnectionConfig, ConnectionOptions};
use crate::origin::{AmbientOriginProvider, NoAmbientOrigin};
use crate::ws::{
    BinaryType, CloseCode, CloseEvent, CloseFrame, ErrorEvent, Message, MessageEvent,
    NativeEvent, NativeListeners, OpenEvent, SocketDriver, SocketHandle, Transport,
    TungsteniteTransport,
};
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::oneshot;
use url::Url;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a client, carried by every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    fn next() -> Self {
        Self(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Why [`WebSocketClient::connect`] did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The socket closed or errored before it opened.
    #[error("connection attempt failed: {0}")]
    Rejected(NativeEvent),
    #[error(transparent)]
    Net(#[from] NetError),
}

type Outcome = Result<(), NativeEvent>;

/// Settles one connect attempt from whichever notification arrives first.
struct ConnectRace {
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

/// WebSocket client.
///
/// Cheap to clone; clones share the socket and the notification bus.
#[derive(Clone)]
pub struct WebSocketClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    id: ClientId,
    config: ConnectionConfig,
    transport: Arc<dyn Transport>,
    bus: NotificationBus,
    // Present only while the socket is not closed.
    socket: Mutex<Option<SocketHandle>>,
}

impl Default for WebSocketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WebSocketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketClient")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("ready_state", &self.ready_state())
            .finish()
    }
}

impl WebSocketClient {
    /// Create a client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client from caller-supplied options.
    pub fn with_options(options: ConnectionOptions) -> Self {
        Self::builder().options(options).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn id(&self) -> ClientId {
        self.inner.id
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    /// Socket endpoint URL.
    pub fn socket_url(&self) -> String {
        self.inner.config.socket_url()
    }

    /// Companion HTTP endpoint URL.
    pub fn http_url(&self) -> String {
        self.inner.config.http_url()
    }

    /// Ready state of the current socket, if there is one.
    pub fn ready_state(&self) -> Option<ReadyState> {
        self.inner.socket.lock().as_ref().map(|s| s.ready_state())
    }

    pub fn is_connected(&self) -> bool {
        self.ready_state() == Some(ReadyState::Open)
    }

    /// Subscribe to every notification of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.inner.bus.on(kind, handler)
    }

    /// Subscribe to the next notification of `kind`.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.inner.bus.once(kind, handler)
    }

    /// Remove a subscription.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.bus.off(id)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.bus.listener_count(kind)
    }

    /// Connect to the socket endpoint.
    ///
    /// Resolves to `Ok(true)` once the socket opens, and to `Ok(false)`
    /// without doing anything if a socket already exists. If the socket
    /// closes or errors before opening, fails with
    /// [`ConnectError::Rejected`] carrying that event.
    ///
    /// There is no timeout; wrap the call in `tokio::time::timeout` if one
    /// is needed.
    ///
    /// A rejection caused by an `Error` event can arrive before the socket
    /// has closed. Until the matching `Disconnect` notification, the dead
    /// socket is still held and another `connect()` returns `Ok(false)`.
    pub async fn connect(&self) -> Result<bool, ConnectError> {
        let (rx, driver) = {
            let mut socket = self.inner.socket.lock();
            if socket.is_some() {
                tracing::warn!(client = %self.inner.id, "connect: already connected");
                return Ok(false);
            }

            let url = self.inner.config.parsed_socket_url()?;
            tracing::debug!(client = %self.inner.id, url = %url, "connecting");

            let (tx, rx) = oneshot::channel();
            self.race_connect(tx);

            let (handle, driver) = self.create_socket(url);
            *socket = Some(handle);
            (rx, driver)
        };
        // Started outside the lock: a transport may report synchronously.
        self.inner.transport.start(driver);

        match rx.await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(event)) => {
                tracing::debug!(client = %self.inner.id, event = %event, "connect rejected");
                Err(ConnectError::Rejected(event))
            }
            // Every socket reports a close, even when its transport drops
            // it, so the race only goes unsettled if the bus lost it.
            Err(_) => Err(ConnectError::Rejected(NativeEvent::Close(CloseEvent {
                code: CloseCode::ABNORMAL.0,
                reason: String::new(),
                was_clean: false,
            }))),
        }
    }

    /// Drop the current socket once it has closed.
    ///
    /// Returns `false`, leaving state untouched, when there is no socket or
    /// the socket is not closed yet. This never closes a live socket; use
    /// [`disconnect`](Self::disconnect) for that. Called automatically
    /// when the socket closes.
    pub fn destroy_socket(&self) -> bool {
        self.inner.destroy_socket()
    }

    /// Start a graceful close of the current socket.
    ///
    /// Returns `false` when there is no socket or it is already closing.
    /// The socket is released when the close completes.
    pub fn disconnect(&self, frame: Option<CloseFrame>) -> bool {
        let socket = self.inner.socket.lock();
        match socket.as_ref() {
            Some(handle) => handle.close(frame),
            None => {
                tracing::warn!(client = %self.inner.id, "disconnect: no socket");
                false
            }
        }
    }

    /// Send a frame on the open socket.
    pub fn send(&self, msg: Message) -> Result<(), NetError> {
        let socket = self.inner.socket.lock();
        let handle = socket.as_ref().ok_or(NetError::SocketNotConnected)?;
        handle.send(msg)
    }

    /// Send a text message.
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), NetError> {
        self.send(Message::Text(text.into()))
    }

    /// Send binary data.
    pub fn send_binary(&self, data: impl Into<Bytes>) -> Result<(), NetError> {
        self.send(Message::Binary(data.into()))
    }

    /// Serialize `value` to JSON and send it as text.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<(), NetError> {
        let text = serde_json::to_string(value).map_err(|_| NetError::InvalidMessage)?;
        self.send_text(text)
    }

    /// Instantiate a socket for `url` with raw-buffer binary frames and the
    /// four native listeners wired to this client.
    ///
    /// The caller owns the handle and starts the driver.
    fn create_socket(&self, url: Url) -> (SocketHandle, SocketDriver) {
        let (handle, driver) = SocketHandle::new(url);
        handle.set_binary_type(BinaryType::ArrayBuffer);

        let open = Arc::downgrade(&self.inner);
        let message = Weak::clone(&open);
        let close = Weak::clone(&open);
        let error = Weak::clone(&open);

        handle.add_listeners(
            NativeListeners::new()
                .on_open(move |e| {
                    if let Some(inner) = open.upgrade() {
                        inner.on_socket_open(e);
                    }
                })
                .on_message(move |e| {
                    if let Some(inner) = message.upgrade() {
                        inner.on_socket_message(e);
                    }
                })
                .on_close(move |e| {
                    if let Some(inner) = close.upgrade() {
                        inner.on_socket_close(e);
                    }
                })
                .on_error(move |e| {
                    if let Some(inner) = error.upgrade() {
                        inner.on_socket_error(e);
                    }
                }),
        );

        (handle, driver)
    }

    /// Register the one-shot listeners that settle a connect attempt.
    ///
    /// `Connect` succeeds; `Disconnect` and `Error` both fail, since an
    /// error is not guaranteed to be followed by a close. The first to fire
    /// removes the others.
    fn race_connect(&self, tx: oneshot::Sender<Outcome>) {
        let race = Arc::new(ConnectRace {
            sender: Mutex::new(Some(tx)),
            subscriptions: Mutex::new(Vec::with_capacity(3)),
        });

        let ids = [EventKind::Connect, EventKind::Disconnect, EventKind::Error].map(|kind| {
            let race = Arc::clone(&race);
            let inner = Arc::downgrade(&self.inner);
            self.inner.bus.once(kind, move |n| {
                let outcome = match n {
                    Notification::Connect { .. } => Ok(()),
                    other => Err(other.native_event()),
                };
                settle(&inner, &race, outcome);
            })
        });
        race.subscriptions.lock().extend(ids);
    }
}

fn settle(inner: &Weak<ClientInner>, race: &ConnectRace, outcome: Outcome) {
    let Some(tx) = race.sender.lock().take() else {
        return;
    };
    let siblings: Vec<SubscriptionId> = race.subscriptions.lock().drain(..).collect();
    if let Some(inner) = inner.upgrade() {
        for id in siblings {
            inner.bus.off(id);
        }
    }
    // The caller may have stopped waiting.
    let _ = tx.send(outcome);
}

impl ClientInner {
    fn destroy_socket(&self) -> bool {
        let mut socket = self.socket.lock();
        let Some(handle) = socket.as_ref() else {
            tracing::warn!(client = %self.id, "destroy_socket: no socket to destroy");
            return false;
        };

        if !handle.ready_state().is_closed() {
            tracing::warn!(
                client = %self.id,
                state = ?handle.ready_state(),
                "destroy_socket: socket is still open"
            );
            return false;
        }

        handle.remove_listeners();
        *socket = None;
        true
    }

    fn on_socket_open(&self, event: OpenEvent) {
        tracing::debug!(client = %self.id, url = %event.url, "socket open");
        self.bus.emit(&Notification::Connect {
            client: self.id,
            event,
        });
    }

    fn on_socket_message(&self, event: MessageEvent) {
        self.bus.emit(&Notification::Message {
            data: event.data.clone(),
            is_binary: event.data.is_binary(),
            client: self.id,
            event,
        });
    }

    fn on_socket_close(&self, event: CloseEvent) {
        tracing::debug!(
            client = %self.id,
            code = event.code,
            reason = %event.reason,
            clean = event.was_clean,
            "socket closed"
        );
        self.destroy_socket();
        self.bus.emit(&Notification::Disconnect {
            code: event.code,
            reason: event.reason.clone(),
            client: self.id,
            event,
        });
    }

    // Informational only; teardown waits for the close event.
    fn on_socket_error(&self, event: ErrorEvent) {
        tracing::debug!(client = %self.id, error = %event.message, "socket error");
        self.bus.emit(&Notification::Error {
            client: self.id,
            event,
        });
    }
}

/// Builder for creating a [`WebSocketClient`].
#[derive(Default)]
pub struct ClientBuilder {
    options: ConnectionOptions,
    origin: Option<Box<dyn AmbientOriginProvider>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Replace all connection options at once.
    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options = self.options.host(host);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.options = self.options.port(port);
        self
    }

    pub fn socket_path(mut self, path: impl Into<String>) -> Self {
        self.options = self.options.socket_path(path);
        self
    }

    pub fn http_path(mut self, path: impl Into<String>) -> Self {
        self.options = self.options.http_path(path);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.options = self.options.secure(secure);
        self
    }

    /// Set the ambient origin consulted when `secure` is not given.
    pub fn origin<P: AmbientOriginProvider + 'static>(mut self, origin: P) -> Self {
        self.origin = Some(Box::new(origin));
        self
    }

    /// Set the socket transport (defaults to [`TungsteniteTransport`]).
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client.
    pub fn build(self) -> WebSocketClient {
        let origin = self.origin.as_deref().unwrap_or(&NoAmbientOrigin);
        let config = ConnectionConfig::resolve(self.options, origin);
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(TungsteniteTransport));

        WebSocketClient {
            inner: Arc::new(ClientInner {
                id: ClientId::next(),
                config,
                transport,
                bus: NotificationBus::new(),
                socket: Mutex::new(None),
            }),
        }
    }
}
