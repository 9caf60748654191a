//! Domain layer for the hub
//!
//! - client / registry: who is registered and how to reach them
//! - subscriptions: pattern matching of message types
//! - message_id: correlation ids and their checksum
//! - pending: bounded table of synchronous calls
//! - config, errors, entities: ambient types

mod client;
mod config;
mod entities;
mod errors;
mod identifiers;
mod message_id;
pub mod mtypes;
mod pending;
mod registry;
pub mod subscriptions;

pub use client::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use identifiers::*;
pub use message_id::*;
pub use pending::*;
pub use registry::*;
pub use subscriptions::{best_subscription, is_subscribed, match_level, NO_MATCH};
