//! Channel receiver adapter
//!
//! Implements [`ClientReceiver`] by forwarding every delivery into a tokio
//! unbounded channel. Useful for in-process clients and for tests; a network
//! transport would implement the port directly.

use crate::ports::{ClientReceiver, DeliveryError};
use async_trait::async_trait;
use shared_types::{ClientId, Message, Response};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One delivery made by the hub to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Notification {
        sender_id: ClientId,
        message: Message,
    },
    Call {
        sender_id: ClientId,
        msg_id: String,
        message: Message,
    },
    Response {
        responder_id: ClientId,
        msg_tag: String,
        response: Response,
    },
}

impl Delivery {
    /// Message type of a notification or call.
    pub fn mtype(&self) -> Option<&str> {
        match self {
            Delivery::Notification { message, .. } | Delivery::Call { message, .. } => {
                Some(&message.mtype)
            }
            Delivery::Response { .. } => None,
        }
    }
}

/// Receiver that pushes deliveries into a channel.
#[derive(Debug, Clone)]
pub struct ChannelReceiver {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ChannelReceiver {
    pub fn new(tx: mpsc::UnboundedSender<Delivery>) -> Self {
        Self { tx }
    }

    /// Create a receiver together with the inbox it feeds.
    pub fn pair() -> (Arc<Self>, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(tx)), rx)
    }

    fn push(&self, delivery: Delivery) -> Result<(), DeliveryError> {
        self.tx.send(delivery).map_err(|_| DeliveryError::Closed)
    }
}

#[async_trait]
impl ClientReceiver for ChannelReceiver {
    async fn receive_notification(
        &self,
        sender_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        self.push(Delivery::Notification {
            sender_id: sender_id.to_string(),
            message: message.clone(),
        })
    }

    async fn receive_call(
        &self,
        sender_id: &str,
        msg_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        self.push(Delivery::Call {
            sender_id: sender_id.to_string(),
            msg_id: msg_id.to_string(),
            message: message.clone(),
        })
    }

    async fn receive_response(
        &self,
        responder_id: &str,
        msg_tag: &str,
        response: &Response,
    ) -> Result<(), DeliveryError> {
        self.push(Delivery::Response {
            responder_id: responder_id.to_string(),
            msg_tag: msg_tag.to_string(),
            response: response.clone(),
        })
    }
}
