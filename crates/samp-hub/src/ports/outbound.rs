//! Driven ports (Outbound callbacks)
//!
//! The transport layer implements [`ClientReceiver`] once per connected
//! client. The hub never inspects the implementation; it only distinguishes
//! a client that has a receiver from one that does not.

use async_trait::async_trait;
use shared_types::{Message, Response};
use std::fmt;
use std::sync::Arc;

/// Failure reported by a receiver for a single delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("client has no receiver installed")]
    NotCallable,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("receiver closed")]
    Closed,
}

/// Callback interface into one client.
///
/// Implementations must return once the delivery is accepted; they must not
/// wait for the client to process it.
#[async_trait]
pub trait ClientReceiver: Send + Sync {
    /// Deliver a notification from `sender_id`.
    async fn receive_notification(
        &self,
        sender_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError>;

    /// Deliver a call from `sender_id`. The client answers with `msg_id`.
    async fn receive_call(
        &self,
        sender_id: &str,
        msg_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError>;

    /// Deliver the reply `responder_id` sent to an earlier asynchronous call
    /// tagged `msg_tag`.
    async fn receive_response(
        &self,
        responder_id: &str,
        msg_tag: &str,
        response: &Response,
    ) -> Result<(), DeliveryError>;
}

/// A client's callback slot.
#[derive(Clone, Default)]
pub enum Receiver {
    /// No callback installed; every delivery fails with `NotCallable`.
    #[default]
    Unreachable,
    /// Deliveries go through this handle.
    Connected(Arc<dyn ClientReceiver>),
}

impl fmt::Debug for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Unreachable => f.write_str("Unreachable"),
            Receiver::Connected(_) => f.write_str("Connected"),
        }
    }
}

impl From<Option<Arc<dyn ClientReceiver>>> for Receiver {
    fn from(handle: Option<Arc<dyn ClientReceiver>>) -> Self {
        handle.map_or(Receiver::Unreachable, Receiver::Connected)
    }
}

impl Receiver {
    /// Whether deliveries can reach the client at all.
    pub fn is_callable(&self) -> bool {
        matches!(self, Receiver::Connected(_))
    }

    pub async fn receive_notification(
        &self,
        sender_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        match self {
            Receiver::Unreachable => Err(DeliveryError::NotCallable),
            Receiver::Connected(handle) => handle.receive_notification(sender_id, message).await,
        }
    }

    pub async fn receive_call(
        &self,
        sender_id: &str,
        msg_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        match self {
            Receiver::Unreachable => Err(DeliveryError::NotCallable),
            Receiver::Connected(handle) => handle.receive_call(sender_id, msg_id, message).await,
        }
    }

    pub async fn receive_response(
        &self,
        responder_id: &str,
        msg_tag: &str,
        response: &Response,
    ) -> Result<(), DeliveryError> {
        match self {
            Receiver::Unreachable => Err(DeliveryError::NotCallable),
            Receiver::Connected(handle) => {
                handle.receive_response(responder_id, msg_tag, response).await
            }
        }
    }
}
