//! # Shared Types Crate
//!
//! This crate contains the data model exchanged between the hub and its
//! clients, and the validation rules applied to every inbound structure.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: messages, responses and registration results
//!   are defined once here and shared by the hub core and its transports.
//! - **Validate at the Boundary**: a `Message`, metadata map, subscriptions map
//!   or `Response` is checked with the `validation` functions before the hub
//!   registers, stores or dispatches anything derived from it.
//! - **7-bit Clean**: every string in the model is restricted to bytes
//!   `0x01..=0x7f` so that any transport can carry it unchanged.

pub mod entities;
pub mod errors;
pub mod validation;

pub use entities::*;
pub use errors::*;
pub use validation::*;
