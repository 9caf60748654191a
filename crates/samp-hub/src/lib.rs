//! # samp-hub
//!
//! Message hub core: clients register, declare what they listen to, and send
//! each other notifications and calls through the hub.
//!
//! ## Architecture
//!
//! ```text
//!  transport ──HubApi──→ [HubEngine] ──ClientReceiver──→ transport
//!                            │
//!          ┌─────────────────┼──────────────────┐
//!          ↓                 ↓                  ↓
//!  [ClientRegistry]  [Subscription match]  [PendingCallTable]
//! ```
//!
//! The engine owns no sockets. A transport drives it through [`HubApi`] and
//! implements [`ClientReceiver`] per connected client; the hub calls back
//! through it to deliver notifications, calls and responses.
//!
//! ### Call Patterns
//!
//! - **notify / notify_all**: fire and forget
//! - **call / call_all**: the reply comes back later through the caller's
//!   receiver, correlated by a checksummed message id
//! - **call_and_wait**: the caller blocks until the reply, a timeout, or
//!   eviction by newer calls when too many are pending
//!
//! ## Usage
//!
//! ```rust,ignore
//! use samp_hub::{ChannelReceiver, HubConfig, HubEngine};
//!
//! let hub = HubEngine::new(HubConfig::from_env())?;
//! hub.start()?;
//!
//! let reg = hub.register().await?;
//! let (receiver, mut inbox) = ChannelReceiver::pair();
//! hub.set_receiver(&reg.private_key, Some(receiver))?;
//!
//! // ... route messages ...
//!
//! hub.shutdown().await;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{ChannelReceiver, Delivery};
pub use domain::{
    mtypes, ConfigError, ErrorKind, HubConfig, HubError, HubResult, HubState, HubStatus,
    MessageId, MessageIdCodec,
};
pub use ports::{ClientReceiver, DeliveryError, HubApi, Receiver};
pub use service::{HubEngine, ShutdownHook};
