//! Hub lifecycle entities.

/// Lifecycle state of a hub.
///
/// ```text
/// [NotStarted] ──start──→ [Running] ──shutdown──→ [Shutdown]
///      │                                               ↑
///      └──────────────────shutdown─────────────────────┘
/// ```
///
/// `Shutdown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    /// Constructed but not yet accepting clients.
    NotStarted,
    /// Accepting registrations and routing messages.
    Running,
    /// Stopped for good.
    Shutdown,
}

/// Point-in-time summary of a hub, for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStatus {
    /// Current lifecycle state.
    pub state: HubState,
    /// Registered clients, the hub's own client included.
    pub registered_clients: usize,
    /// Synchronous calls awaiting a reply.
    pub pending_calls: usize,
}
