//! # Core Domain Entities
//!
//! Defines the message model exchanged through the hub.
//!
//! ## Clusters
//!
//! - **Values**: `Value`, `Map` (recursive string / list / map structures)
//! - **Messages**: `Message`, `Metadata`, `Subscriptions`
//! - **Responses**: `Response`, `Status`, `ErrorInfo`
//! - **Registration**: `RegistrationInfo`, `ClientId`
//!
//! Field names on the wire follow the `samp.*` convention so that transports
//! can serialize these types directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// CLUSTER A: VALUES
// =============================================================================

/// Public identifier of a registered client (e.g. `c3`, or the hub's own id).
pub type ClientId = String;

/// A string-keyed map of values. Ordered so iteration is deterministic.
pub type Map = BTreeMap<String, Value>;

/// A message value: a string, a list of values, or a map of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Leaf value.
    String(String),
    /// Ordered list.
    List(Vec<Value>),
    /// String-keyed map.
    Map(Map),
}

impl Value {
    /// Returns the string if this is a leaf value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is a map value.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the items if this is a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

// =============================================================================
// CLUSTER B: MESSAGES
// =============================================================================

/// Client metadata: an open map such as `samp.name`, `samp.icon.url`.
pub type Metadata = Map;

/// Subscriptions: message-type pattern to annotation map (usually empty).
pub type Subscriptions = BTreeMap<String, Map>;

/// A typed message sent through the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message type (MType), never wildcarded.
    #[serde(rename = "samp.mtype")]
    pub mtype: String,
    /// Named parameters.
    #[serde(rename = "samp.params", default)]
    pub params: Map,
}

impl Message {
    /// Create a message with no parameters.
    pub fn new(mtype: impl Into<String>) -> Self {
        Self {
            mtype: mtype.into(),
            params: Map::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Look up a string parameter.
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

// =============================================================================
// CLUSTER C: RESPONSES
// =============================================================================

/// Outcome category of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Processing succeeded.
    #[serde(rename = "samp.ok")]
    Ok,
    /// Processing succeeded with caveats; both result and error are present.
    #[serde(rename = "samp.warning")]
    Warning,
    /// Processing failed.
    #[serde(rename = "samp.error")]
    Error,
}

/// Error details carried by warning and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Short description of what went wrong.
    #[serde(rename = "samp.errortxt")]
    pub error_text: String,
    /// Text suitable for presenting to a user.
    #[serde(rename = "samp.usertxt", default, skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,
    /// Detailed text for debugging, e.g. a stack trace.
    #[serde(rename = "samp.debugtxt", default, skip_serializing_if = "Option::is_none")]
    pub debug_text: Option<String>,
    /// Application-defined error code.
    #[serde(rename = "samp.code", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Any further non-standard entries.
    #[serde(flatten)]
    pub extra: Map,
}

impl ErrorInfo {
    /// Create error info with only the mandatory text.
    pub fn new(error_text: impl Into<String>) -> Self {
        Self {
            error_text: error_text.into(),
            user_text: None,
            debug_text: None,
            code: None,
            extra: Map::new(),
        }
    }

    /// Attach an error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Reply to a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome category.
    #[serde(rename = "samp.status")]
    pub status: Status,
    /// Result map; required unless the status is `Error`.
    #[serde(rename = "samp.result", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Map>,
    /// Error details; required unless the status is `Ok`.
    #[serde(rename = "samp.error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl Response {
    /// Successful response.
    pub fn ok(result: Map) -> Self {
        Self {
            status: Status::Ok,
            result: Some(result),
            error: None,
        }
    }

    /// Successful response with caveats.
    pub fn warning(result: Map, error: ErrorInfo) -> Self {
        Self {
            status: Status::Warning,
            result: Some(result),
            error: Some(error),
        }
    }

    /// Failed response.
    pub fn error(error: ErrorInfo) -> Self {
        Self {
            status: Status::Error,
            result: None,
            error: Some(error),
        }
    }

    /// Whether the status is `Ok`.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Whether the fields present match what the status requires.
    pub fn is_well_formed(&self) -> bool {
        match self.status {
            Status::Ok => self.result.is_some(),
            Status::Warning => self.result.is_some() && self.error.is_some(),
            Status::Error => self.error.is_some(),
        }
    }
}

// =============================================================================
// CLUSTER D: REGISTRATION
// =============================================================================

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    /// Public id of the hub's own client.
    #[serde(rename = "samp.hub-id")]
    pub hub_id: ClientId,
    /// Public id assigned to the registering client.
    #[serde(rename = "samp.self-id")]
    pub self_id: ClientId,
    /// Capability token the client presents on every subsequent call.
    #[serde(rename = "samp.private-key")]
    pub private_key: String,
}
