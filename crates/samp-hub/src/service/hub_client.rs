//! The hub's own client.
//!
//! Registered at start under the configured hub id. It is the sender of every
//! hub event and answers `samp.app.ping`.

use super::{HubEngine, Inner};
use crate::domain::{mtypes, HubConfig};
use crate::ports::{ClientReceiver, DeliveryError};
use async_trait::async_trait;
use shared_types::{ErrorInfo, Map, Message, Metadata, Response, Subscriptions, Value};
use std::sync::Weak;
use tracing::debug;

pub(super) fn hub_metadata(config: &HubConfig) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(mtypes::META_NAME.to_string(), Value::from(config.hub_name.as_str()));
    metadata.insert(
        mtypes::META_DESCRIPTION.to_string(),
        Value::from("Message hub routing notifications and calls between clients"),
    );
    metadata
}

pub(super) fn hub_subscriptions() -> Subscriptions {
    let mut subscriptions = Subscriptions::new();
    subscriptions.insert(mtypes::APP_PING.to_string(), Map::new());
    subscriptions
}

fn answer(message: &Message) -> Response {
    if message.mtype == mtypes::APP_PING {
        Response::ok(Map::new())
    } else {
        Response::error(ErrorInfo::new(format!(
            "Hub does not handle {}",
            message.mtype
        )))
    }
}

/// Receiver installed on the hub client.
///
/// Holds the engine weakly so the engine can be dropped while this receiver
/// is still referenced from the registry.
pub(super) struct HubReceiver {
    engine: Weak<Inner>,
    private_key: String,
}

impl HubReceiver {
    pub(super) fn new(engine: Weak<Inner>, private_key: String) -> Self {
        Self {
            engine,
            private_key,
        }
    }
}

#[async_trait]
impl ClientReceiver for HubReceiver {
    async fn receive_notification(
        &self,
        sender_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        debug!(sender = %sender_id, mtype = %message.mtype, "Hub client notified");
        Ok(())
    }

    async fn receive_call(
        &self,
        sender_id: &str,
        msg_id: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        let Some(inner) = self.engine.upgrade() else {
            return Err(DeliveryError::Closed);
        };
        let engine = HubEngine::from_inner(inner);
        let private_key = self.private_key.clone();
        let msg_id = msg_id.to_string();
        let response = answer(message);
        let sender_id = sender_id.to_string();

        // The caller may be blocked in call_and_wait until this reply lands,
        // so it must not be sent from inside the delivery.
        tokio::spawn(async move {
            if let Err(e) = engine.reply(&private_key, &msg_id, response).await {
                debug!(sender = %sender_id, error = %e, "Hub client reply not delivered");
            }
        });
        Ok(())
    }

    async fn receive_response(
        &self,
        responder_id: &str,
        _msg_tag: &str,
        _response: &Response,
    ) -> Result<(), DeliveryError> {
        debug!(responder = %responder_id, "Hub client received a response");
        Ok(())
    }
}
