//! # Pending Synchronous Calls
//!
//! Bounded table of synchronous calls awaiting a reply.
//!
//! ```text
//! put(id) ──► [ entry + oneshot ] ──► complete(id, resp) ──► waiter wakes
//!                    │
//!                    ├── full: oldest entry evicted ──► waiter gets Evicted
//!                    └── abort_all() ────────────────► waiter gets ShutDown
//! ```
//!
//! Each entry owns the sending half of a oneshot channel; the caller keeps the
//! receiving half. Removal and completion happen under one lock, so a reply
//! is delivered to at most one waiter and a second reply finds no entry.
//! A [`PendingGuard`] held by the waiter removes the entry if the wait is
//! abandoned.

use super::errors::{HubError, HubResult};
use super::message_id::MessageId;
use parking_lot::Mutex;
use shared_types::Response;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// How a pending call ended, as seen by its waiter.
#[derive(Debug)]
pub enum PendingOutcome {
    /// The recipient replied.
    Completed(Response),
    /// The table was full and this was the oldest entry.
    Evicted,
    /// The hub shut down.
    ShutDown,
}

/// Receiving half handed to the caller of [`PendingCallTable::put`].
pub type PendingReceiver = oneshot::Receiver<PendingOutcome>;

#[derive(Debug)]
struct PendingEntry {
    /// Insertion order; lower is older.
    seq: u64,
    responder: oneshot::Sender<PendingOutcome>,
}

#[derive(Debug, Default)]
struct TableInner {
    entries: HashMap<MessageId, PendingEntry>,
    next_seq: u64,
}

/// Bounded map from sync message id to waiting caller.
#[derive(Debug)]
pub struct PendingCallTable {
    capacity: usize,
    inner: Mutex<TableInner>,
}

impl PendingCallTable {
    /// Create a table holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(TableInner::default()),
        }
    }

    /// Maximum number of simultaneous entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of calls currently waiting.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether no call is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a new pending call, evicting the oldest entries if full.
    pub fn put(&self, id: MessageId) -> PendingReceiver {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();

        while inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(id, _)| id.clone());
            let Some(oldest) = oldest else { break };
            if let Some(entry) = inner.entries.remove(&oldest) {
                warn!(
                    sender = %oldest.sender_id(),
                    capacity = self.capacity,
                    "Pending call table full, aborting oldest call"
                );
                let _ = entry.responder.send(PendingOutcome::Evicted);
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(id, PendingEntry { seq, responder: tx });
        rx
    }

    /// Hand `response` to the waiter for `id`.
    ///
    /// Returns false if no entry exists (already answered, timed out or
    /// evicted).
    pub fn complete(&self, id: &MessageId, response: Response) -> bool {
        let Some(entry) = self.inner.lock().entries.remove(id) else {
            debug!(sender = %id.sender_id(), "Reply for unknown pending call");
            return false;
        };
        // A waiter that gave up between removal and send is the same as a
        // late reply.
        entry.responder.send(PendingOutcome::Completed(response)).is_ok()
    }

    /// Drop the entry for `id` without notifying its waiter.
    pub fn remove(&self, id: &MessageId) -> bool {
        self.inner.lock().entries.remove(id).is_some()
    }

    /// Wait up to `wait` for the outcome of `id`, removing its entry on timeout.
    pub async fn await_and_remove(
        &self,
        id: &MessageId,
        mut rx: PendingReceiver,
        wait: Duration,
    ) -> HubResult<Response> {
        let outcome = match tokio::time::timeout(wait, &mut rx).await {
            Ok(Ok(outcome)) => outcome,
            // Sender dropped without a value: treat as aborted.
            Ok(Err(_)) => return Err(HubError::HubShutDown),
            Err(_) => {
                if self.remove(id) {
                    return Err(HubError::Timeout(wait));
                }
                // Someone removed the entry as the timer fired; the outcome
                // is either already in the channel or about to be.
                match rx.try_recv() {
                    Ok(outcome) => outcome,
                    Err(_) => return Err(HubError::Timeout(wait)),
                }
            }
        };

        match outcome {
            PendingOutcome::Completed(response) => Ok(response),
            PendingOutcome::Evicted => Err(HubError::LoadExceeded),
            PendingOutcome::ShutDown => Err(HubError::HubShutDown),
        }
    }

    /// Abort every waiting call.
    pub fn abort_all(&self) -> usize {
        let drained: Vec<_> = self.inner.lock().entries.drain().collect();
        let count = drained.len();
        for (_, entry) in drained {
            let _ = entry.responder.send(PendingOutcome::ShutDown);
        }
        count
    }
}

/// Removes a pending entry when dropped, unless disarmed.
///
/// Held by a waiting caller so that abandoning the wait frees the slot.
#[derive(Debug)]
pub struct PendingGuard<'a> {
    table: &'a PendingCallTable,
    id: Option<MessageId>,
}

impl<'a> PendingGuard<'a> {
    pub fn new(table: &'a PendingCallTable, id: MessageId) -> Self {
        Self {
            table,
            id: Some(id),
        }
    }

    /// The entry has already been resolved; leave the table alone.
    pub fn disarm(mut self) {
        self.id = None;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            if self.table.remove(&id) {
                debug!(sender = %id.sender_id(), "Waiter gone, pending call dropped");
            }
        }
    }
}
