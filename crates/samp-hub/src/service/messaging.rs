//! Message routing: notifications, calls and replies.
//!
//! ```text
//! notify / call ────────► recipient.receive_{notification,call}
//! notify_all / call_all ─► every subscribed client (failures logged, skipped)
//! call_and_wait ─► pending.put ─► receive_call ─► await_and_remove
//!                                                      ▲
//! reply ── Sync id ─► pending.complete ────────────────┘
//!       └─ Async id ─► sender.receive_response
//!
//! hub event ─► per-client queue ─► spawned worker ─► receive_notification
//! ```
//!
//! Hub events never make the announcing operation wait: each recipient has
//! its own queue, so a stalled receiver only delays its own events.

use super::HubEngine;
use crate::domain::{
    Client, EventSender, HubError, HubResult, HubState, MessageId, PendingGuard,
};
use crate::ports::{DeliveryError, Receiver};
use futures::future::join_all;
use shared_types::{validate_message, validate_response, ClientId, Message, Response};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Start the worker draining one client's event queue.
///
/// The worker ends once the client is dropped and its queue is empty.
fn spawn_event_worker(sender_id: ClientId, recipient_id: ClientId) -> EventSender {
    let (tx, mut rx) = mpsc::unbounded_channel::<(Receiver, Message)>();
    tokio::spawn(async move {
        while let Some((receiver, event)) = rx.recv().await {
            if let Err(e) = receiver.receive_notification(&sender_id, &event).await {
                warn!(
                    recipient = %recipient_id,
                    mtype = %event.mtype,
                    error = %e,
                    "Hub event delivery failed"
                );
            }
        }
        debug!(recipient = %recipient_id, "Event queue drained");
    });
    tx
}

impl HubEngine {
    /// Resolve `recipient_id` and check it accepts `mtype`.
    fn subscribed_recipient(&self, recipient_id: &str, mtype: &str) -> HubResult<Arc<Client>> {
        let recipient = self.resolve_client(recipient_id)?;
        if !recipient.is_subscribed(mtype) {
            return Err(HubError::NotSubscribed {
                recipient: recipient_id.to_string(),
                mtype: mtype.to_string(),
            });
        }
        Ok(recipient)
    }

    /// Subscribed clients other than the sender.
    fn subscribed_clients(&self, sender_id: &str, mtype: &str) -> Vec<Arc<Client>> {
        self.inner
            .registry
            .snapshot()
            .into_iter()
            .filter(|c| c.id() != sender_id && c.is_subscribed(mtype))
            .collect()
    }

    /// Subscribed clients other than the sender, with their receivers.
    fn broadcast_targets(&self, sender_id: &str, mtype: &str) -> Vec<(ClientId, Receiver)> {
        self.subscribed_clients(sender_id, mtype)
            .into_iter()
            .map(|c| (c.id().to_string(), c.receiver()))
            .collect()
    }

    /// Collect the ids that accepted a broadcast, logging the rest.
    fn broadcast_outcome(
        mtype: &str,
        results: Vec<(ClientId, Result<(), DeliveryError>)>,
    ) -> Vec<ClientId> {
        let mut delivered = Vec::with_capacity(results.len());
        for (recipient, result) in results {
            match result {
                Ok(()) => delivered.push(recipient),
                Err(e) => warn!(
                    recipient = %recipient,
                    mtype = %mtype,
                    error = %e,
                    "Broadcast delivery failed, continuing with remaining recipients"
                ),
            }
        }
        delivered
    }

    async fn broadcast_notification(&self, sender_id: &str, message: &Message) -> Vec<ClientId> {
        let targets = self.broadcast_targets(sender_id, &message.mtype);
        let results = join_all(targets.into_iter().map(|(recipient, receiver)| async move {
            let result = receiver.receive_notification(sender_id, message).await;
            (recipient, result)
        }))
        .await;
        Self::broadcast_outcome(&message.mtype, results)
    }

    /// Queue a message from the hub's own client for `recipient`.
    pub(super) fn queue_from_hub(&self, recipient: &Client, event: Message) -> bool {
        let hub_id = self.inner.hub_client.id();
        recipient.queue_event(recipient.receiver(), event, || {
            spawn_event_worker(hub_id.to_string(), recipient.id().to_string())
        })
    }

    /// Announce a hub event to every subscribed client.
    ///
    /// Returns once the event is queued. Does not check the lifecycle state,
    /// so shutdown can use it.
    pub(super) fn publish_event(&self, event: Message) {
        let recipients = self.subscribed_clients(self.inner.hub_client.id(), &event.mtype);
        let queued = recipients
            .iter()
            .filter(|recipient| self.queue_from_hub(recipient, event.clone()))
            .count();
        debug!(mtype = %event.mtype, receivers = queued, "Hub event queued");
    }

    // === NOTIFICATIONS ===

    /// Send a notification to one subscribed client.
    pub async fn notify(
        &self,
        private_key: &str,
        recipient_id: &str,
        message: Message,
    ) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        validate_message(&message)?;
        let recipient = self.subscribed_recipient(recipient_id, &message.mtype)?;

        debug!(sender = %caller.id(), recipient = %recipient_id, mtype = %message.mtype, "Notify");
        recipient
            .receiver()
            .receive_notification(caller.id(), &message)
            .await
            .map_err(|e| HubError::delivery(recipient_id, e))
    }

    /// Send a notification to every subscribed client except the caller.
    ///
    /// Returns the ids that accepted it.
    pub async fn notify_all(&self, private_key: &str, message: Message) -> HubResult<Vec<ClientId>> {
        let caller = self.caller(private_key)?;
        validate_message(&message)?;

        let delivered = self.broadcast_notification(caller.id(), &message).await;
        debug!(sender = %caller.id(), mtype = %message.mtype, receivers = delivered.len(), "Notify all");
        Ok(delivered)
    }

    // === ASYNCHRONOUS CALLS ===

    /// Send a call to one subscribed client; the reply comes back to the
    /// caller's receiver tagged with `msg_tag`.
    pub async fn call(
        &self,
        private_key: &str,
        recipient_id: &str,
        msg_tag: &str,
        message: Message,
    ) -> HubResult<String> {
        let caller = self.caller(private_key)?;
        validate_message(&message)?;
        let recipient = self.subscribed_recipient(recipient_id, &message.mtype)?;

        let msg_id = self.inner.codec.encode(&MessageId::Async {
            sender_id: caller.id().to_string(),
            sender_tag: msg_tag.to_string(),
        });
        debug!(sender = %caller.id(), recipient = %recipient_id, mtype = %message.mtype, "Call");
        recipient
            .receiver()
            .receive_call(caller.id(), &msg_id, &message)
            .await
            .map_err(|e| HubError::delivery(recipient_id, e))?;
        Ok(msg_id)
    }

    /// Send a call to every subscribed client except the caller.
    ///
    /// All recipients get the same message id. A failed delivery is logged
    /// and does not stop the others.
    pub async fn call_all(
        &self,
        private_key: &str,
        msg_tag: &str,
        message: Message,
    ) -> HubResult<String> {
        let caller = self.caller(private_key)?;
        validate_message(&message)?;

        let msg_id = self.inner.codec.encode(&MessageId::Async {
            sender_id: caller.id().to_string(),
            sender_tag: msg_tag.to_string(),
        });
        let targets = self.broadcast_targets(caller.id(), &message.mtype);
        let (msg_id_ref, message_ref, sender_id) = (&msg_id, &message, caller.id());
        let results = join_all(targets.into_iter().map(|(recipient, receiver)| async move {
            let result = receiver.receive_call(sender_id, msg_id_ref, message_ref).await;
            (recipient, result)
        }))
        .await;

        let delivered = Self::broadcast_outcome(&message.mtype, results);
        debug!(sender = %caller.id(), mtype = %message.mtype, receivers = delivered.len(), "Call all");
        Ok(msg_id)
    }

    // === SYNCHRONOUS CALLS ===

    /// Send a call and wait for the reply.
    ///
    /// `timeout_secs <= 0` waits up to the configured ceiling; larger values
    /// are clamped to it.
    ///
    /// # Errors
    ///
    /// Besides routing errors: `Timeout` if no reply arrived in time,
    /// `LoadExceeded` if the call was evicted by newer ones, `HubShutDown` if
    /// the hub stopped while waiting.
    pub async fn call_and_wait(
        &self,
        private_key: &str,
        recipient_id: &str,
        message: Message,
        timeout_secs: i64,
    ) -> HubResult<Response> {
        let caller = self.caller(private_key)?;
        validate_message(&message)?;
        let recipient = self.subscribed_recipient(recipient_id, &message.mtype)?;

        let id = MessageId::Sync {
            sender_id: caller.id().to_string(),
            handle: self.inner.next_handle.fetch_add(1, Ordering::Relaxed),
        };
        let rx = self.inner.pending.put(id.clone());
        // Removes the entry if this future is dropped before it finishes.
        let guard = PendingGuard::new(&self.inner.pending, id.clone());
        if self.state() != HubState::Running {
            // Shutdown drained the table before this entry went in.
            return Err(HubError::HubShutDown);
        }
        let msg_id = self.inner.codec.encode(&id);

        debug!(
            sender = %caller.id(),
            recipient = %recipient_id,
            mtype = %message.mtype,
            timeout_secs,
            "Synchronous call"
        );
        recipient
            .receiver()
            .receive_call(caller.id(), &msg_id, &message)
            .await
            .map_err(|e| HubError::delivery(recipient_id, e))?;

        let wait = self.inner.config.effective_timeout(timeout_secs);
        let outcome = self.inner.pending.await_and_remove(&id, rx, wait).await;
        guard.disarm();
        if let Err(e) = &outcome {
            warn!(sender = %caller.id(), recipient = %recipient_id, error = %e, "Synchronous call failed");
        }
        outcome
    }

    // === REPLIES ===

    /// Answer a call delivered to the caller under `msg_id`.
    pub async fn reply(&self, private_key: &str, msg_id: &str, response: Response) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        validate_response(&response)?;

        match self.inner.codec.decode(msg_id)? {
            id @ MessageId::Sync { .. } => {
                if !self.inner.pending.complete(&id, response) {
                    return Err(HubError::DuplicateReply(msg_id.to_string()));
                }
                debug!(responder = %caller.id(), sender = %id.sender_id(), "Synchronous reply");
                Ok(())
            }
            MessageId::Async {
                sender_id,
                sender_tag,
            } => {
                let sender = self.resolve_client(&sender_id)?;
                debug!(responder = %caller.id(), sender = %sender_id, "Asynchronous reply");
                sender
                    .receiver()
                    .receive_response(caller.id(), &sender_tag, &response)
                    .await
                    .map_err(|e| HubError::delivery(&sender_id, e))
            }
        }
    }
}
