//! Adapters layer
//!
//! In-process implementations of the outbound ports.

mod channel;

pub use channel::*;
