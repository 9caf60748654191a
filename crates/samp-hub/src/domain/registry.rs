//! # Client Registry
//!
//! Concurrent index of registered clients by public id and by private key.
//!
//! Both maps live under one lock so that a client is always present in both
//! or neither. Broadcasts iterate over a [`ClientRegistry::snapshot`], never
//! over the live maps.

use super::client::Client;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<String, Arc<Client>>,
    by_key: HashMap<String, Arc<Client>>,
}

/// Registered clients.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    indexes: RwLock<Indexes>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client, replacing any entry with the same id or key.
    pub fn add(&self, client: Arc<Client>) {
        let mut indexes = self.indexes.write();
        indexes
            .by_key
            .insert(client.private_key().to_string(), Arc::clone(&client));
        indexes.by_id.insert(client.id().to_string(), client);
    }

    /// Remove a client. Returns false if it was not registered.
    pub fn remove(&self, client: &Client) -> bool {
        let mut indexes = self.indexes.write();
        let removed = indexes.by_id.remove(client.id()).is_some();
        indexes.by_key.remove(client.private_key());
        removed
    }

    pub fn by_public_id(&self, id: &str) -> Option<Arc<Client>> {
        self.indexes.read().by_id.get(id).cloned()
    }

    pub fn by_private_key(&self, key: &str) -> Option<Arc<Client>> {
        self.indexes.read().by_key.get(key).cloned()
    }

    /// Point-in-time copy of all clients, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Client>> {
        let mut clients: Vec<_> = self.indexes.read().by_id.values().cloned().collect();
        clients.sort_by_key(|c| c.seq());
        clients
    }

    pub fn len(&self) -> usize {
        self.indexes.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every client.
    pub fn clear(&self) {
        let mut indexes = self.indexes.write();
        indexes.by_id.clear();
        indexes.by_key.clear();
    }
}
