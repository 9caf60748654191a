//! Hub Service - Core routing logic
//!
//! # Architecture
//! - One explicitly constructed [`HubEngine`] per hub; no process-wide state
//! - Lifecycle `NotStarted → Running → Shutdown`
//! - Registry and pending-call table are the only shared structures; every
//!   receiver callback runs outside their locks
//!
//! Registration and query operations live here; message routing is in
//! `messaging.rs`.

mod api;
mod hub_client;
mod messaging;


use crate::domain::{
    mtypes, Client, ClientRegistry, ConfigError, HubConfig, HubError, HubResult, HubState,
    HubStatus, IdGenerator, MessageIdCodec, PendingCallTable,
};
use crate::ports::{ClientReceiver, Receiver};
use hub_client::HubReceiver;
use parking_lot::Mutex;
use shared_types::{
    validate_metadata, validate_subscriptions, ClientId, Map, Message, Metadata,
    RegistrationInfo, Subscriptions, Value,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tracing::{debug, info};

/// Cleanup callback run once when the hub shuts down.
pub type ShutdownHook = Box<dyn FnOnce() + Send>;

pub(crate) struct Inner {
    config: HubConfig,
    state: Mutex<HubState>,
    registry: ClientRegistry,
    ids: IdGenerator,
    codec: MessageIdCodec,
    pending: PendingCallTable,
    /// Next opaque handle for a synchronous call.
    next_handle: AtomicU64,
    /// The hub's own client.
    hub_client: Arc<Client>,
    shutdown_hooks: Mutex<Vec<ShutdownHook>>,
}

/// Message hub.
///
/// Cheap to clone; clones share the same hub.
#[derive(Clone)]
pub struct HubEngine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for HubEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubEngine")
            .field("hub_id", &self.inner.config.hub_id)
            .field("status", &self.status())
            .finish()
    }
}

impl HubEngine {
    /// Create a hub that is not yet started.
    pub fn new(config: HubConfig) -> Result<Self, ConfigError> {
        Self::with_shutdown_hooks(config, Vec::new())
    }

    /// Create a hub whose shutdown runs `hooks` in order.
    pub fn with_shutdown_hooks(
        config: HubConfig,
        hooks: Vec<ShutdownHook>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = MessageIdCodec::new()?;

        let ids = IdGenerator::new();
        let hub_client = Arc::new(Client::new(
            config.hub_id.clone(),
            ids.next_private_key(),
            0,
        ));
        hub_client.set_metadata(hub_client::hub_metadata(&config));
        hub_client.set_subscriptions(hub_client::hub_subscriptions());

        let inner = Arc::new(Inner {
            pending: PendingCallTable::new(config.max_pending_calls),
            config,
            state: Mutex::new(HubState::NotStarted),
            registry: ClientRegistry::new(),
            ids,
            codec,
            next_handle: AtomicU64::new(1),
            hub_client: Arc::clone(&hub_client),
            shutdown_hooks: Mutex::new(hooks),
        });

        let receiver = HubReceiver::new(
            Arc::downgrade(&inner),
            hub_client.private_key().to_string(),
        );
        hub_client.set_receiver(Receiver::Connected(Arc::new(receiver)));

        Ok(Self { inner })
    }

    fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Public id of the hub's own client.
    pub fn hub_id(&self) -> &str {
        self.inner.hub_client.id()
    }

    pub fn state(&self) -> HubState {
        *self.inner.state.lock()
    }

    pub fn status(&self) -> HubStatus {
        HubStatus {
            state: self.state(),
            registered_clients: self.inner.registry.len(),
            pending_calls: self.inner.pending.len(),
        }
    }

    // === LIFECYCLE ===

    /// Start accepting clients.
    ///
    /// Starting a running hub is a no-op; a shut-down hub cannot restart.
    pub fn start(&self) -> HubResult<()> {
        let mut state = self.inner.state.lock();
        match *state {
            HubState::Running => return Ok(()),
            HubState::Shutdown => return Err(HubError::NotRunning(HubState::Shutdown)),
            HubState::NotStarted => {}
        }
        *state = HubState::Running;
        self.inner.registry.add(Arc::clone(&self.inner.hub_client));

        info!(
            hub_id = %self.hub_id(),
            max_pending_calls = self.inner.config.max_pending_calls,
            max_timeout_secs = self.inner.config.max_timeout_secs,
            "Hub started"
        );
        Ok(())
    }

    /// Stop the hub. Idempotent.
    ///
    /// The first call queues the shutdown event, aborts every waiting
    /// synchronous call, drops all clients and runs the shutdown hooks. It
    /// never waits on a client's receiver.
    pub async fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.inner.state.lock(), HubState::Shutdown);
        if previous == HubState::Shutdown {
            return;
        }

        if previous == HubState::Running {
            self.publish_event(Message::new(mtypes::EVENT_SHUTDOWN));
        }
        let aborted = self.inner.pending.abort_all();
        self.inner.registry.clear();

        let hooks = std::mem::take(&mut *self.inner.shutdown_hooks.lock());
        let hook_count = hooks.len();
        for hook in hooks {
            hook();
        }

        info!(aborted_calls = aborted, hooks = hook_count, "Hub shut down");
    }

    fn ensure_running(&self) -> HubResult<()> {
        match self.state() {
            HubState::Running => Ok(()),
            other => Err(HubError::NotRunning(other)),
        }
    }

    /// Resolve the calling client from its private key.
    fn caller(&self, private_key: &str) -> HubResult<Arc<Client>> {
        self.ensure_running()?;
        self.inner
            .registry
            .by_private_key(private_key)
            .ok_or(HubError::UnknownPrivateKey)
    }

    /// Resolve another client by public id.
    fn resolve_client(&self, client_id: &str) -> HubResult<Arc<Client>> {
        if let Some(client) = self.inner.registry.by_public_id(client_id) {
            return Ok(client);
        }
        if self.inner.ids.was_issued(client_id) {
            Err(HubError::NoLongerRegistered(client_id.to_string()))
        } else {
            Err(HubError::NoSuchClient(client_id.to_string()))
        }
    }

    // === REGISTRATION ===

    /// Register a new client and announce it.
    pub async fn register(&self) -> HubResult<RegistrationInfo> {
        self.ensure_running()?;

        let (seq, id) = self.inner.ids.next_public_id();
        let private_key = self.inner.ids.next_private_key();
        let client = Arc::new(Client::new(id.clone(), private_key.clone(), seq));
        self.inner.registry.add(Arc::clone(&client));
        if let Err(e) = self.ensure_running() {
            // Shutdown cleared the registry before the add landed.
            self.inner.registry.remove(&client);
            return Err(e);
        }
        info!(client_id = %id, "Client registered");

        self.publish_event(Message::new(mtypes::EVENT_REGISTER).with_param("id", id.as_str()));

        Ok(RegistrationInfo {
            hub_id: self.hub_id().to_string(),
            self_id: id,
            private_key,
        })
    }

    /// Unregister the caller and announce it.
    pub async fn unregister(&self, private_key: &str) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        self.remove_client(&caller);
        Ok(())
    }

    /// Forcibly remove a client, telling it why if it listens.
    ///
    /// The disconnect message is queued like a hub event and delivered best
    /// effort.
    pub async fn disconnect(&self, client_id: &str, reason: &str) -> HubResult<()> {
        self.ensure_running()?;
        if client_id == self.hub_id() {
            return Err(HubError::ProtectedClient(client_id.to_string()));
        }
        let client = self.resolve_client(client_id)?;

        if client.is_subscribed(mtypes::HUB_DISCONNECT) {
            let message = Message::new(mtypes::HUB_DISCONNECT).with_param("reason", reason);
            if !self.queue_from_hub(&client, message) {
                debug!(client_id = %client_id, "Disconnect notice not queued");
            }
        }

        info!(client_id = %client_id, reason = %reason, "Disconnecting client");
        self.remove_client(&client);
        Ok(())
    }

    fn remove_client(&self, client: &Client) {
        if !self.inner.registry.remove(client) {
            return;
        }
        client.close_events();
        info!(client_id = %client.id(), "Client unregistered");
        self.publish_event(Message::new(mtypes::EVENT_UNREGISTER).with_param("id", client.id()));
    }

    /// Install or clear the caller's callback.
    pub fn set_receiver(
        &self,
        private_key: &str,
        receiver: Option<Arc<dyn ClientReceiver>>,
    ) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        let receiver = Receiver::from(receiver);
        debug!(client_id = %caller.id(), callable = receiver.is_callable(), "Receiver set");
        caller.set_receiver(receiver);
        Ok(())
    }

    /// Replace the caller's metadata and announce it.
    pub async fn declare_metadata(&self, private_key: &str, metadata: Metadata) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        validate_metadata(&metadata)?;
        caller.set_metadata(metadata.clone());
        debug!(client_id = %caller.id(), entries = metadata.len(), "Metadata declared");

        let event = Message::new(mtypes::EVENT_METADATA)
            .with_param("id", caller.id())
            .with_param("metadata", metadata);
        self.publish_event(event);
        Ok(())
    }

    /// Replace the caller's subscriptions and announce them.
    pub async fn declare_subscriptions(
        &self,
        private_key: &str,
        subscriptions: Subscriptions,
    ) -> HubResult<()> {
        let caller = self.caller(private_key)?;
        if !caller.is_callable() {
            return Err(HubError::NotCallable(caller.id().to_string()));
        }
        validate_subscriptions(&subscriptions)?;
        caller.set_subscriptions(subscriptions.clone());
        debug!(client_id = %caller.id(), patterns = subscriptions.len(), "Subscriptions declared");

        let event = Message::new(mtypes::EVENT_SUBSCRIPTIONS)
            .with_param("id", caller.id())
            .with_param("subscriptions", subscriptions_value(subscriptions));
        self.publish_event(event);
        Ok(())
    }

    // === QUERIES ===

    pub fn get_metadata(&self, private_key: &str, client_id: &str) -> HubResult<Metadata> {
        self.caller(private_key)?;
        Ok(self.resolve_client(client_id)?.metadata())
    }

    pub fn get_subscriptions(
        &self,
        private_key: &str,
        client_id: &str,
    ) -> HubResult<Subscriptions> {
        self.caller(private_key)?;
        Ok(self.resolve_client(client_id)?.subscriptions())
    }

    /// Ids of every registered client except the caller.
    pub fn get_registered_clients(&self, private_key: &str) -> HubResult<Vec<ClientId>> {
        let caller = self.caller(private_key)?;
        Ok(self
            .inner
            .registry
            .snapshot()
            .into_iter()
            .filter(|c| c.id() != caller.id())
            .map(|c| c.id().to_string())
            .collect())
    }

    /// Clients other than the caller subscribed to `mtype`, with annotations.
    pub fn get_subscribed_clients(
        &self,
        private_key: &str,
        mtype: &str,
    ) -> HubResult<BTreeMap<ClientId, Map>> {
        let caller = self.caller(private_key)?;
        Ok(self
            .inner
            .registry
            .snapshot()
            .into_iter()
            .filter(|c| c.id() != caller.id())
            .filter_map(|c| {
                c.best_subscription(mtype)
                    .map(|annotation| (c.id().to_string(), annotation))
            })
            .collect())
    }
}

fn subscriptions_value(subscriptions: Subscriptions) -> Value {
    Value::Map(
        subscriptions
            .into_iter()
            .map(|(pattern, annotation)| (pattern, Value::Map(annotation)))
            .collect(),
    )
}
