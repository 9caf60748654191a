//! Message types the hub itself sends or answers.

/// Broadcast after a client registers. Params: `id`.
pub const EVENT_REGISTER: &str = "samp.hub.event.register";

/// Broadcast after a client unregisters or is disconnected. Params: `id`.
pub const EVENT_UNREGISTER: &str = "samp.hub.event.unregister";

/// Broadcast after a client declares metadata. Params: `id`, `metadata`.
pub const EVENT_METADATA: &str = "samp.hub.event.metadata";

/// Broadcast after a client declares subscriptions. Params: `id`, `subscriptions`.
pub const EVENT_SUBSCRIPTIONS: &str = "samp.hub.event.subscriptions";

/// Broadcast once when the hub shuts down. No params.
pub const EVENT_SHUTDOWN: &str = "samp.hub.event.shutdown";

/// Sent to a client the hub is forcibly removing. Params: `reason`.
pub const HUB_DISCONNECT: &str = "samp.hub.disconnect";

/// Liveness probe; the hub's own client answers it.
pub const APP_PING: &str = "samp.app.ping";

/// Metadata key for an application's display name.
pub const META_NAME: &str = "samp.name";

/// Metadata key for a one-line description.
pub const META_DESCRIPTION: &str = "samp.description.text";
