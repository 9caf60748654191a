//! # Error Types
//!
//! Defines the data-validation errors raised when an inbound structure does
//! not satisfy the shape or charset rules of the message model.

use thiserror::Error;

/// A message, metadata map, subscriptions map or response is malformed.
///
/// Always local to the single operation that received the structure; the
/// hub rejects it before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A string contains a byte outside `0x01..=0x7f`.
    #[error("Illegal character 0x{byte:02x} in {context}")]
    IllegalCharacter { context: String, byte: u8 },

    /// A message type is empty or not a dot-separated sequence of atoms.
    #[error("Bad message type: {0:?}")]
    BadMType(String),

    /// A subscription key does not follow the pattern grammar.
    #[error("Bad subscription pattern: {0:?}")]
    BadPattern(String),

    /// A response does not carry the fields its status requires.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for validation operations.
pub type DataResult<T> = Result<T, DataError>;
