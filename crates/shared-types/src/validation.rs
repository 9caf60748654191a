//! # Data Validation
//!
//! Shape and charset rules applied to every inbound message, metadata map,
//! subscriptions map and response.
//!
//! ## Rules
//!
//! - Every string (map keys included) consists only of bytes `0x01..=0x7f`.
//! - A message type is a dot-separated sequence of atoms `[a-z0-9\-_]+`.
//! - A subscription key is `*`, a message type, or a message type followed
//!   by `.*`.
//! - A response carries the result and error fields its status requires.
//!
//! Structural rules (keys are strings, leaves are strings) are enforced by
//! the `Value` type itself.

use crate::entities::{Map, Message, Metadata, Response, Subscriptions, Value};
use crate::errors::{DataError, DataResult};

/// The bare wildcard subscription pattern.
pub const WILDCARD: &str = "*";

/// Check that a string is 7-bit clean with no NUL bytes.
pub fn validate_string(s: &str, context: &str) -> DataResult<()> {
    match s.bytes().find(|b| !(0x01..=0x7f).contains(b)) {
        Some(byte) => Err(DataError::IllegalCharacter {
            context: context.to_string(),
            byte,
        }),
        None => Ok(()),
    }
}

/// Recursively check a value.
pub fn validate_value(value: &Value, context: &str) -> DataResult<()> {
    match value {
        Value::String(s) => validate_string(s, context),
        Value::List(items) => items.iter().try_for_each(|v| validate_value(v, context)),
        Value::Map(map) => validate_map(map, context),
    }
}

/// Recursively check every key and value of a map.
pub fn validate_map(map: &Map, context: &str) -> DataResult<()> {
    for (key, value) in map {
        validate_string(key, context)?;
        validate_value(value, context)?;
    }
    Ok(())
}

/// Whether `s` is one atom of a message type.
fn is_atom(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Whether `s` is a concrete (non-wildcarded) message type.
pub fn is_valid_mtype(s: &str) -> bool {
    s.split('.').all(is_atom)
}

/// Whether `s` is a legal subscription pattern.
pub fn is_valid_pattern(s: &str) -> bool {
    if s == WILDCARD {
        return true;
    }
    match s.strip_suffix(".*") {
        Some(prefix) => is_valid_mtype(prefix),
        None => is_valid_mtype(s),
    }
}

/// Validate a message before dispatch.
pub fn validate_message(message: &Message) -> DataResult<()> {
    validate_string(&message.mtype, "samp.mtype")?;
    if !is_valid_mtype(&message.mtype) {
        return Err(DataError::BadMType(message.mtype.clone()));
    }
    validate_map(&message.params, "samp.params")
}

/// Validate a metadata map before storage.
pub fn validate_metadata(metadata: &Metadata) -> DataResult<()> {
    validate_map(metadata, "metadata")
}

/// Validate a subscriptions map before storage.
pub fn validate_subscriptions(subscriptions: &Subscriptions) -> DataResult<()> {
    for (pattern, annotation) in subscriptions {
        validate_string(pattern, "subscriptions")?;
        if !is_valid_pattern(pattern) {
            return Err(DataError::BadPattern(pattern.clone()));
        }
        validate_map(annotation, "subscriptions")?;
    }
    Ok(())
}

/// Validate a response before routing it back to the caller.
pub fn validate_response(response: &Response) -> DataResult<()> {
    if !response.is_well_formed() {
        return Err(DataError::MalformedResponse(format!(
            "status {:?} is missing required fields",
            response.status
        )));
    }
    if let Some(result) = &response.result {
        validate_map(result, "samp.result")?;
    }
    if let Some(error) = &response.error {
        validate_string(&error.error_text, "samp.errortxt")?;
        for text in [&error.user_text, &error.debug_text, &error.code]
            .into_iter()
            .flatten()
        {
            validate_string(text, "samp.error")?;
        }
        validate_map(&error.extra, "samp.error")?;
    }
    Ok(())
}
