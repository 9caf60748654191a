//! [`HubApi`] implementation for [`HubEngine`].

use super::HubEngine;
use crate::domain::HubResult;
use crate::ports::{ClientReceiver, HubApi};
use async_trait::async_trait;
use shared_types::{ClientId, Map, Message, Metadata, RegistrationInfo, Response, Subscriptions};
use std::collections::BTreeMap;
use std::sync::Arc;

#[async_trait]
impl HubApi for HubEngine {
    async fn register(&self) -> HubResult<RegistrationInfo> {
        HubEngine::register(self).await
    }

    async fn unregister(&self, private_key: &str) -> HubResult<()> {
        HubEngine::unregister(self, private_key).await
    }

    async fn set_receiver(
        &self,
        private_key: &str,
        receiver: Option<Arc<dyn ClientReceiver>>,
    ) -> HubResult<()> {
        HubEngine::set_receiver(self, private_key, receiver)
    }

    async fn declare_metadata(&self, private_key: &str, metadata: Metadata) -> HubResult<()> {
        HubEngine::declare_metadata(self, private_key, metadata).await
    }

    async fn declare_subscriptions(
        &self,
        private_key: &str,
        subscriptions: Subscriptions,
    ) -> HubResult<()> {
        HubEngine::declare_subscriptions(self, private_key, subscriptions).await
    }

    async fn get_metadata(&self, private_key: &str, client_id: &str) -> HubResult<Metadata> {
        HubEngine::get_metadata(self, private_key, client_id)
    }

    async fn get_subscriptions(
        &self,
        private_key: &str,
        client_id: &str,
    ) -> HubResult<Subscriptions> {
        HubEngine::get_subscriptions(self, private_key, client_id)
    }

    async fn get_registered_clients(&self, private_key: &str) -> HubResult<Vec<ClientId>> {
        HubEngine::get_registered_clients(self, private_key)
    }

    async fn get_subscribed_clients(
        &self,
        private_key: &str,
        mtype: &str,
    ) -> HubResult<BTreeMap<ClientId, Map>> {
        HubEngine::get_subscribed_clients(self, private_key, mtype)
    }

    async fn notify(
        &self,
        private_key: &str,
        recipient_id: &str,
        message: Message,
    ) -> HubResult<()> {
        HubEngine::notify(self, private_key, recipient_id, message).await
    }

    async fn notify_all(&self, private_key: &str, message: Message) -> HubResult<Vec<ClientId>> {
        HubEngine::notify_all(self, private_key, message).await
    }

    async fn call(
        &self,
        private_key: &str,
        recipient_id: &str,
        msg_tag: &str,
        message: Message,
    ) -> HubResult<String> {
        HubEngine::call(self, private_key, recipient_id, msg_tag, message).await
    }

    async fn call_all(
        &self,
        private_key: &str,
        msg_tag: &str,
        message: Message,
    ) -> HubResult<String> {
        HubEngine::call_all(self, private_key, msg_tag, message).await
    }

    async fn call_and_wait(
        &self,
        private_key: &str,
        recipient_id: &str,
        message: Message,
        timeout_secs: i64,
    ) -> HubResult<Response> {
        HubEngine::call_and_wait(self, private_key, recipient_id, message, timeout_secs).await
    }

    async fn reply(&self, private_key: &str, msg_id: &str, response: Response) -> HubResult<()> {
        HubEngine::reply(self, private_key, msg_id, response).await
    }
}
