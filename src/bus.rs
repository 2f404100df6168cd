//! Notification bus.
//!
//! Publish/subscribe surface of a client. Subscribers register for an
//! [`EventKind`] either persistently ([`NotificationBus::on`]) or for a
//! single delivery ([`NotificationBus::once`]), and unsubscribe with the
//! returned [`SubscriptionId`].
//!
//! Handlers run outside the bus lock, in registration order, so a handler
//! may subscribe or unsubscribe (including its siblings) while being
//! dispatched.

use crate::client::ClientId;
use crate::ws::{CloseEvent, ErrorEvent, MessageData, MessageEvent, NativeEvent, OpenEvent};
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Kinds of notification a client publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Message,
    Disconnect,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "connect",
            EventKind::Message => "message",
            EventKind::Disconnect => "disconnect",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The socket opened.
    Connect { client: ClientId, event: OpenEvent },
    /// A message arrived. `is_binary` is true iff `data` is a raw byte buffer.
    Message {
        data: MessageData,
        is_binary: bool,
        client: ClientId,
        event: MessageEvent,
    },
    /// The socket closed. The client has already dropped its handle.
    Disconnect {
        code: u16,
        reason: String,
        client: ClientId,
        event: CloseEvent,
    },
    /// The transport reported an error.
    Error { client: ClientId, event: ErrorEvent },
}

impl Notification {
    pub fn kind(&self) -> EventKind {
        match self {
            Notification::Connect { .. } => EventKind::Connect,
            Notification::Message { .. } => EventKind::Message,
            Notification::Disconnect { .. } => EventKind::Disconnect,
            Notification::Error { .. } => EventKind::Error,
        }
    }

    pub fn client(&self) -> ClientId {
        match self {
            Notification::Connect { client, .. }
            | Notification::Message { client, .. }
            | Notification::Disconnect { client, .. }
            | Notification::Error { client, .. } => *client,
        }
    }

    /// The raw native event behind this notification.
    pub fn native_event(&self) -> NativeEvent {
        match self {
            Notification::Connect { event, .. } => NativeEvent::Open(event.clone()),
            Notification::Message { event, .. } => NativeEvent::Message(event.clone()),
            Notification::Disconnect { event, .. } => NativeEvent::Close(event.clone()),
            Notification::Error { event, .. } => NativeEvent::Error(event.clone()),
        }
    }
}

/// Handle for removing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    once: bool,
    handler: Handler,
}

/// Thread-safe publish/subscribe bus.
pub struct NotificationBus {
    subscriptions: DashMap<EventKind, Vec<Subscription>>,
    next_id: AtomicU64,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscriptions", &self.total_listeners())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to every notification of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribe(kind, false, Arc::new(handler))
    }

    /// Subscribe to the next notification of `kind` only.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribe(kind, true, Arc::new(handler))
    }

    /// Remove a subscription. Returns `false` if it was not registered
    /// (already removed, or a one-shot that already fired).
    pub fn off(&self, id: SubscriptionId) -> bool {
        for mut entry in self.subscriptions.iter_mut() {
            if let Some(pos) = entry.iter().position(|s| s.id == id) {
                entry.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `notification` to its subscribers.
    ///
    /// One-shot subscriptions are removed before any handler runs. Returns
    /// the number of handlers invoked.
    pub fn emit(&self, notification: &Notification) -> usize {
        let handlers: Vec<Handler> = match self.subscriptions.get_mut(&notification.kind()) {
            Some(mut subs) => {
                let handlers = subs.iter().map(|s| Arc::clone(&s.handler)).collect();
                subs.retain(|s| !s.once);
                handlers
            }
            None => Vec::new(),
        };

        for handler in &handlers {
            handler(notification);
        }
        handlers.len()
    }

    /// Number of subscriptions for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, |subs| subs.len())
    }

    fn total_listeners(&self) -> usize {
        self.subscriptions.iter().map(|subs| subs.len()).sum()
    }

    fn subscribe(&self, kind: EventKind, once: bool, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .entry(kind)
            .or_insert_with(Vec::new)
            .push(Subscription { id, once, handler });
        id
    }
}
