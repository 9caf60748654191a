//! Ports layer (Hexagonal Architecture)
//!
//! - Inbound: [`HubApi`], what a transport calls on behalf of its clients.
//! - Outbound: [`ClientReceiver`], how the hub calls back into a client.

mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;
