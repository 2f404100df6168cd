//! Native socket handle.
//!
//! A socket is split in two views over the same shared state:
//! - [`SocketHandle`]: held by the client. Reads the ready state, registers
//!   the four native listeners and queues outgoing frames.
//! - [`SocketDriver`]: held by the [`Transport`](super::transport::Transport).
//!   Advances the ready state, dispatches native events and drains the
//!   outgoing queue onto the wire.
//!
//! Listeners are never invoked while the listener lock is held, so a
//! listener may call back into the handle (e.g. to remove itself).

use super::event::{BinaryType, CloseEvent, ErrorEvent, MessageData, MessageEvent, OpenEvent};
use super::message::{CloseCode, CloseFrame, Message};
use crate::base::neterror::NetError;
use crate::base::readystate::ReadyState;
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

type Callback<E> = Arc<dyn Fn(E) + Send + Sync>;

/// The four native event listeners of a socket.
#[derive(Clone)]
pub struct NativeListeners {
    on_open: Callback<OpenEvent>,
    on_message: Callback<MessageEvent>,
    on_close: Callback<CloseEvent>,
    on_error: Callback<ErrorEvent>,
}

impl Default for NativeListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeListeners").finish_non_exhaustive()
    }
}

impl NativeListeners {
    /// Listeners that ignore every event.
    pub fn new() -> Self {
        Self {
            on_open: Arc::new(|_| {}),
            on_message: Arc::new(|_| {}),
            on_close: Arc::new(|_| {}),
            on_error: Arc::new(|_| {}),
        }
    }

    pub fn on_open(mut self, f: impl Fn(OpenEvent) + Send + Sync + 'static) -> Self {
        self.on_open = Arc::new(f);
        self
    }

    pub fn on_message(mut self, f: impl Fn(MessageEvent) + Send + Sync + 'static) -> Self {
        self.on_message = Arc::new(f);
        self
    }

    pub fn on_close(mut self, f: impl Fn(CloseEvent) + Send + Sync + 'static) -> Self {
        self.on_close = Arc::new(f);
        self
    }

    pub fn on_error(mut self, f: impl Fn(ErrorEvent) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(f);
        self
    }
}

struct Shared {
    url: Url,
    state: AtomicU8,
    binary_type: Mutex<BinaryType>,
    listeners: Mutex<Option<NativeListeners>>,
}

impl Shared {
    fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.state.load(Ordering::Acquire))
    }

    fn set_ready_state(&self, state: ReadyState) -> ReadyState {
        ReadyState::from(self.state.swap(state.as_u8(), Ordering::AcqRel))
    }

    /// Move to `to` only from one of `from`. A concurrent `Closed` is never
    /// overwritten.
    fn transition(&self, from: &[ReadyState], to: ReadyState) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                from.contains(&ReadyState::from(current)).then_some(to.as_u8())
            })
            .is_ok()
    }

    fn listeners(&self) -> Option<NativeListeners> {
        self.listeners.lock().clone()
    }
}

/// Client-side view of a socket.
pub struct SocketHandle {
    shared: Arc<Shared>,
    outgoing: mpsc::UnboundedSender<Message>,
}

impl fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandle")
            .field("url", &self.shared.url.as_str())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}

impl SocketHandle {
    /// Create a socket in the `Connecting` state.
    ///
    /// Nothing happens on the wire until the driver is handed to a transport.
    pub fn new(url: Url) -> (SocketHandle, SocketDriver) {
        let shared = Arc::new(Shared {
            url,
            state: AtomicU8::new(ReadyState::Connecting.as_u8()),
            binary_type: Mutex::new(BinaryType::default()),
            listeners: Mutex::new(None),
        });
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = SocketHandle {
            shared: Arc::clone(&shared),
            outgoing: tx,
        };
        let driver = SocketDriver {
            shared,
            outgoing: rx,
        };
        (handle, driver)
    }

    pub fn url(&self) -> &Url {
        &self.shared.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.shared.ready_state()
    }

    pub fn binary_type(&self) -> BinaryType {
        *self.shared.binary_type.lock()
    }

    pub fn set_binary_type(&self, binary_type: BinaryType) {
        *self.shared.binary_type.lock() = binary_type;
    }

    /// Register the native listeners, replacing any previous set.
    pub fn add_listeners(&self, listeners: NativeListeners) {
        *self.shared.listeners.lock() = Some(listeners);
    }

    /// Unregister the native listeners. Returns `false` if none were set.
    pub fn remove_listeners(&self) -> bool {
        self.shared.listeners.lock().take().is_some()
    }

    pub fn has_listeners(&self) -> bool {
        self.shared.listeners.lock().is_some()
    }

    /// Queue a frame for sending. Only allowed while `Open`.
    pub fn send(&self, msg: Message) -> Result<(), NetError> {
        if self.ready_state() != ReadyState::Open {
            return Err(NetError::SocketNotConnected);
        }
        self.outgoing
            .send(msg)
            .map_err(|_| NetError::ConnectionClosed)
    }

    /// Start the closing handshake.
    ///
    /// Returns `false` if the socket is already closing or closed.
    pub fn close(&self, frame: Option<CloseFrame>) -> bool {
        if !self.shared.transition(
            &[ReadyState::Connecting, ReadyState::Open],
            ReadyState::Closing,
        ) {
            return false;
        }
        // The driver may already be gone; it reports the close itself then.
        let _ = self.outgoing.send(Message::Close(frame));
        true
    }
}

/// Transport-side view of a socket.
pub struct SocketDriver {
    shared: Arc<Shared>,
    outgoing: mpsc::UnboundedReceiver<Message>,
}

impl fmt::Debug for SocketDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketDriver")
            .field("url", &self.shared.url.as_str())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}

impl SocketDriver {
    pub fn url(&self) -> &Url {
        &self.shared.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.shared.ready_state()
    }

    /// Next frame queued by the client.
    ///
    /// Returns `None` once the handle has been dropped.
    pub async fn next_outgoing(&mut self) -> Option<Message> {
        self.outgoing.recv().await
    }

    /// Handshake completed.
    pub fn opened(&self) {
        if !self
            .shared
            .transition(&[ReadyState::Connecting], ReadyState::Open)
        {
            return;
        }
        if let Some(listeners) = self.shared.listeners() {
            (listeners.on_open)(OpenEvent {
                url: self.shared.url.clone(),
            });
        }
    }

    /// A text frame arrived.
    pub fn text(&self, text: String) {
        self.dispatch_message(MessageData::Text(text));
    }

    /// A binary frame arrived.
    pub fn binary(&self, data: Bytes) {
        let binary_type = *self.shared.binary_type.lock();
        self.dispatch_message(MessageData::binary(data, binary_type));
    }

    /// The peer started the closing handshake.
    pub fn closing(&self) {
        self.shared.transition(&[ReadyState::Open], ReadyState::Closing);
    }

    /// A transport failure occurred.
    pub fn errored(&self, message: impl Into<String>) {
        if let Some(listeners) = self.shared.listeners() {
            (listeners.on_error)(ErrorEvent::new(message));
        }
    }

    /// The socket is closed. Only the first call dispatches.
    pub fn closed(&self, code: u16, reason: impl Into<String>, was_clean: bool) {
        if self.shared.set_ready_state(ReadyState::Closed).is_closed() {
            return;
        }
        if let Some(listeners) = self.shared.listeners() {
            (listeners.on_close)(CloseEvent {
                code,
                reason: reason.into(),
                was_clean,
            });
        }
    }

    fn dispatch_message(&self, data: MessageData) {
        if self.shared.ready_state() != ReadyState::Open {
            return;
        }
        if let Some(listeners) = self.shared.listeners() {
            (listeners.on_message)(MessageEvent {
                data,
                origin: self.shared.url.origin().ascii_serialization(),
            });
        }
    }
}

impl Drop for SocketDriver {
    // A transport that gives up without reporting still ends the socket.
    fn drop(&mut self) {
        if !self.ready_state().is_closed() {
            tracing::debug!(url = %self.shared.url, "socket driver dropped before close");
            self.closed(CloseCode::ABNORMAL.0, "", false);
        }
    }
}
