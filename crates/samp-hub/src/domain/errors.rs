//! Error types for the hub.
//!
//! Two broad kinds reach a caller: data-validation errors (the structure it
//! sent was malformed) and protocol errors (the request cannot be honoured in
//! the hub's current state). Receiver failures are a third, narrower kind:
//! they wrap whatever the transport reported for a single delivery.
//! None of these is fatal to the hub.

use super::entities::HubState;
use crate::ports::DeliveryError;
use shared_types::{ClientId, DataError};
use std::time::Duration;

/// Hub error types
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("Invalid data: {0}")]
    InvalidData(#[from] DataError),

    #[error("Hub is not running (state: {0:?})")]
    NotRunning(HubState),

    #[error("Unknown private key")]
    UnknownPrivateKey,

    #[error("No such client: {0}")]
    NoSuchClient(ClientId),

    #[error("Client {0} is no longer registered")]
    NoLongerRegistered(ClientId),

    #[error("Client {recipient} is not subscribed to {mtype}")]
    NotSubscribed { recipient: ClientId, mtype: String },

    #[error("Client {0} is not callable")]
    NotCallable(ClientId),

    #[error("The hub client {0} cannot be disconnected")]
    ProtectedClient(ClientId),

    #[error("Malformed message id {msg_id:?}: {reason}")]
    MalformedMessageId { msg_id: String, reason: &'static str },

    #[error("Response ignored - call {0} already answered or timed out")]
    DuplicateReply(String),

    #[error("Synchronous call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Synchronous call aborted - load exceeded")]
    LoadExceeded,

    #[error("Synchronous call aborted - hub shut down")]
    HubShutDown,

    #[error("Delivery to {recipient} failed: {source}")]
    Delivery {
        recipient: ClientId,
        #[source]
        source: DeliveryError,
    },
}

/// Broad classification of a [`HubError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Message, metadata, subscriptions or response violated the data rules.
    DataValidation,
    /// The request is well-formed but not acceptable in the current state.
    Protocol,
    /// A recipient's receiver failed to accept a delivery.
    Delivery,
}

impl HubError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HubError::InvalidData(_) => ErrorKind::DataValidation,
            HubError::Delivery { .. } => ErrorKind::Delivery,
            _ => ErrorKind::Protocol,
        }
    }

    pub(crate) fn delivery(recipient: &str, source: DeliveryError) -> Self {
        HubError::Delivery {
            recipient: recipient.to_string(),
            source,
        }
    }
}

/// Result type for hub operations
pub type HubResult<T> = Result<T, HubError>;
