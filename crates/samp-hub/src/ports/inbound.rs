//! Driving ports (Inbound API)
//!
//! Every client-facing operation except `register` identifies its caller by
//! the private key issued at registration.

use super::outbound::ClientReceiver;
use crate::domain::HubResult;
use async_trait::async_trait;
use shared_types::{ClientId, Map, Message, Metadata, RegistrationInfo, Response, Subscriptions};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Primary hub API, as driven by a transport profile.
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Register a new client.
    async fn register(&self) -> HubResult<RegistrationInfo>;

    /// Unregister the caller.
    async fn unregister(&self, private_key: &str) -> HubResult<()>;

    /// Install or clear the caller's callback.
    async fn set_receiver(
        &self,
        private_key: &str,
        receiver: Option<Arc<dyn ClientReceiver>>,
    ) -> HubResult<()>;

    /// Replace the caller's metadata.
    async fn declare_metadata(&self, private_key: &str, metadata: Metadata) -> HubResult<()>;

    /// Replace the caller's subscriptions. The caller must be callable.
    async fn declare_subscriptions(
        &self,
        private_key: &str,
        subscriptions: Subscriptions,
    ) -> HubResult<()>;

    /// Metadata of another client.
    async fn get_metadata(&self, private_key: &str, client_id: &str) -> HubResult<Metadata>;

    /// Subscriptions of another client.
    async fn get_subscriptions(
        &self,
        private_key: &str,
        client_id: &str,
    ) -> HubResult<Subscriptions>;

    /// Ids of every other registered client.
    async fn get_registered_clients(&self, private_key: &str) -> HubResult<Vec<ClientId>>;

    /// Other clients subscribed to `mtype`, with their subscription annotation.
    async fn get_subscribed_clients(
        &self,
        private_key: &str,
        mtype: &str,
    ) -> HubResult<BTreeMap<ClientId, Map>>;

    /// Send a notification to one client.
    async fn notify(&self, private_key: &str, recipient_id: &str, message: Message)
        -> HubResult<()>;

    /// Send a notification to every subscribed client. Returns the recipients.
    async fn notify_all(&self, private_key: &str, message: Message) -> HubResult<Vec<ClientId>>;

    /// Send an asynchronous call to one client. Returns the message id.
    async fn call(
        &self,
        private_key: &str,
        recipient_id: &str,
        msg_tag: &str,
        message: Message,
    ) -> HubResult<String>;

    /// Send an asynchronous call to every subscribed client.
    async fn call_all(&self, private_key: &str, msg_tag: &str, message: Message)
        -> HubResult<String>;

    /// Send a call and wait for the reply. `timeout_secs <= 0` waits up to the
    /// configured ceiling.
    async fn call_and_wait(
        &self,
        private_key: &str,
        recipient_id: &str,
        message: Message,
        timeout_secs: i64,
    ) -> HubResult<Response>;

    /// Answer a call previously delivered to the caller.
    async fn reply(&self, private_key: &str, msg_id: &str, response: Response) -> HubResult<()>;
}
