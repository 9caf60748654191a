//! # Message Identifiers
//!
//! Correlates a reply with the call it answers.
//!
//! ## Wire Form
//!
//! ```text
//! <sender-id> ;; <S|A> ;; <checksum> ;; <tag>
//! ```
//!
//! - **Async** ids carry the caller's own tag. The hub keeps no record of
//!   them; everything needed to route the reply is in the string.
//! - **Sync** ids carry an opaque hub-allocated handle and key an entry in the
//!   pending-call table.
//!
//! The checksum is a truncated HMAC-SHA256 over sender, tag and flag, keyed
//! with a seed that lives as long as the codec. It only stops a client from
//! fabricating an id it was never issued.

use super::config::ConfigError;
use super::errors::{HubError, HubResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared_types::ClientId;

type HmacSha256 = Hmac<Sha256>;

/// Field delimiter in the encoded form.
pub const DELIMITER: &str = ";;";

/// Width of the checksum field in hex characters.
pub const CHECKSUM_WIDTH: usize = 8;

const SYNC_FLAG: &str = "S";
const ASYNC_FLAG: &str = "A";

/// A decoded correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Reply is routed to `sender_id`'s receiver along with `sender_tag`.
    Async {
        sender_id: ClientId,
        sender_tag: String,
    },
    /// Reply completes the pending-call entry keyed by this id.
    Sync { sender_id: ClientId, handle: u64 },
}

impl MessageId {
    /// Id of the client that issued the call.
    pub fn sender_id(&self) -> &str {
        match self {
            MessageId::Async { sender_id, .. } | MessageId::Sync { sender_id, .. } => sender_id,
        }
    }

    /// Whether the caller is blocked waiting for the reply.
    pub fn is_synchronous(&self) -> bool {
        matches!(self, MessageId::Sync { .. })
    }

    fn tag(&self) -> String {
        match self {
            MessageId::Async { sender_tag, .. } => sender_tag.clone(),
            MessageId::Sync { handle, .. } => handle.to_string(),
        }
    }
}

/// Encodes and verifies message ids for one hub.
pub struct MessageIdCodec {
    /// MAC already keyed with the seed; cloned per id.
    keyed: HmacSha256,
}

impl std::fmt::Debug for MessageIdCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageIdCodec").finish_non_exhaustive()
    }
}

impl MessageIdCodec {
    /// Create a codec with a fresh random seed.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_seed(rand::random())
    }

    /// Create a codec with a fixed seed.
    pub fn with_seed(seed: [u8; 32]) -> Result<Self, ConfigError> {
        let keyed = HmacSha256::new_from_slice(&seed)
            .map_err(|e| ConfigError::MessageIdKey(e.to_string()))?;
        Ok(Self { keyed })
    }

    fn mac(&self, sender_id: &str, tag: &str, synchronous: bool) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(sender_id.as_bytes());
        mac.update(&[0]);
        mac.update(tag.as_bytes());
        mac.update(&[0]);
        mac.update(if synchronous { SYNC_FLAG } else { ASYNC_FLAG }.as_bytes());
        mac
    }

    fn checksum(&self, sender_id: &str, tag: &str, synchronous: bool) -> String {
        let digest = self.mac(sender_id, tag, synchronous).finalize().into_bytes();
        let mut hex = hex::encode(digest);
        hex.truncate(CHECKSUM_WIDTH);
        hex
    }

    /// Render the wire form of an id.
    pub fn encode(&self, id: &MessageId) -> String {
        let tag = id.tag();
        let synchronous = id.is_synchronous();
        let flag = if synchronous { SYNC_FLAG } else { ASYNC_FLAG };
        let checksum = self.checksum(id.sender_id(), &tag, synchronous);
        [id.sender_id(), flag, &checksum, &tag].join(DELIMITER)
    }

    /// Parse and verify the wire form of an id.
    ///
    /// # Errors
    ///
    /// `MalformedMessageId` if a field is missing, the flag is unknown, the
    /// checksum does not verify, or a sync handle is not numeric.
    pub fn decode(&self, text: &str) -> HubResult<MessageId> {
        let malformed = |reason| HubError::MalformedMessageId {
            msg_id: text.to_string(),
            reason,
        };

        let mut fields = text.splitn(4, DELIMITER);
        let (Some(sender_id), Some(flag), Some(checksum), Some(tag)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed("missing field"));
        };
        if sender_id.is_empty() {
            return Err(malformed("empty sender id"));
        }
        let synchronous = match flag {
            SYNC_FLAG => true,
            ASYNC_FLAG => false,
            _ => return Err(malformed("unknown synchronicity flag")),
        };

        if checksum.len() != CHECKSUM_WIDTH {
            return Err(malformed("checksum mismatch"));
        }
        let expected = hex::decode(checksum).map_err(|_| malformed("checksum mismatch"))?;
        self.mac(sender_id, tag, synchronous)
            .verify_truncated_left(&expected)
            .map_err(|_| malformed("checksum mismatch"))?;

        if synchronous {
            let handle = tag.parse().map_err(|_| malformed("bad sync handle"))?;
            Ok(MessageId::Sync {
                sender_id: sender_id.to_string(),
                handle,
            })
        } else {
            Ok(MessageId::Async {
                sender_id: sender_id.to_string(),
                sender_tag: tag.to_string(),
            })
        }
    }
}
