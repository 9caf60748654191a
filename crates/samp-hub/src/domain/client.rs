//! A registered client as the hub sees it.

use super::subscriptions;
use crate::ports::Receiver;
use parking_lot::{Mutex, RwLock};
use shared_types::{ClientId, Map, Message, Metadata, Subscriptions};
use tokio::sync::mpsc;

/// Feeds hub events to one client's receiver, in the order they were queued.
pub type EventSender = mpsc::UnboundedSender<(Receiver, Message)>;

#[derive(Debug, Default)]
enum EventQueue {
    #[default]
    Idle,
    Open(EventSender),
    /// The client left; later events are dropped.
    Closed,
}

#[derive(Debug, Default)]
struct ClientState {
    metadata: Metadata,
    subscriptions: Subscriptions,
    receiver: Receiver,
}

/// A registered client.
///
/// Identity is fixed at registration. The mutable fields are written only on
/// behalf of the client itself and are copied out on read.
#[derive(Debug)]
pub struct Client {
    id: ClientId,
    private_key: String,
    /// Registration order; the hub client is 0.
    seq: u64,
    state: RwLock<ClientState>,
    events: Mutex<EventQueue>,
}

impl Client {
    pub fn new(id: ClientId, private_key: String, seq: u64) -> Self {
        Self {
            id,
            private_key,
            seq,
            state: RwLock::new(ClientState::default()),
            events: Mutex::new(EventQueue::Idle),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn metadata(&self) -> Metadata {
        self.state.read().metadata.clone()
    }

    pub fn set_metadata(&self, metadata: Metadata) {
        self.state.write().metadata = metadata;
    }

    pub fn subscriptions(&self) -> Subscriptions {
        self.state.read().subscriptions.clone()
    }

    pub fn set_subscriptions(&self, subscriptions: Subscriptions) {
        self.state.write().subscriptions = subscriptions;
    }

    /// Current callback slot. Cloning only bumps a reference count.
    pub fn receiver(&self) -> Receiver {
        self.state.read().receiver.clone()
    }

    pub fn set_receiver(&self, receiver: Receiver) {
        self.state.write().receiver = receiver;
    }

    pub fn is_callable(&self) -> bool {
        self.state.read().receiver.is_callable()
    }

    /// Whether this client is callable and has a pattern matching `mtype`.
    pub fn is_subscribed(&self, mtype: &str) -> bool {
        let state = self.state.read();
        subscriptions::is_subscribed(&state.subscriptions, mtype, state.receiver.is_callable())
    }

    /// Annotation of the best pattern matching `mtype`.
    ///
    /// Returns `None` for a non-callable client, matching [`Self::is_subscribed`].
    pub fn best_subscription(&self, mtype: &str) -> Option<Map> {
        let state = self.state.read();
        if !state.receiver.is_callable() {
            return None;
        }
        subscriptions::best_subscription(&state.subscriptions, mtype).cloned()
    }

    /// Queue `event` for delivery through `receiver`.
    ///
    /// The queue is created by `open` on first use. Returns false once the
    /// queue has been closed.
    pub fn queue_event(
        &self,
        receiver: Receiver,
        event: Message,
        open: impl FnOnce() -> EventSender,
    ) -> bool {
        let mut events = self.events.lock();
        if matches!(*events, EventQueue::Idle) {
            *events = EventQueue::Open(open());
        }
        match &*events {
            EventQueue::Open(queue) => queue.send((receiver, event)).is_ok(),
            EventQueue::Idle | EventQueue::Closed => false,
        }
    }

    /// Refuse further events. Events already queued are still delivered.
    pub fn close_events(&self) {
        *self.events.lock() = EventQueue::Closed;
    }
}
