//! # Identifier Generation
//!
//! - Public ids are `c1`, `c2`, ... in registration order. The highest issued
//!   sequence number is remembered so that an id can be classified as "never
//!   issued" or "issued and since retired".
//! - Private keys are random capability tokens and are never reused.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Prefix of every hub-assigned client id.
pub const CLIENT_ID_PREFIX: char = 'c';

/// Prefix of every private key.
pub const PRIVATE_KEY_PREFIX: &str = "k:";

/// Extract the sequence number from a client id such as `c12`.
pub fn parse_sequence(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(CLIENT_ID_PREFIX)?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Allocates public ids and private keys for one hub.
#[derive(Debug, Default)]
pub struct IdGenerator {
    /// Highest sequence number handed out so far (0 = none).
    last_issued: AtomicU64,
}

impl IdGenerator {
    /// Create a generator that has issued nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next public id, returning its sequence number too.
    pub fn next_public_id(&self) -> (u64, String) {
        let seq = self.last_issued.fetch_add(1, Ordering::SeqCst) + 1;
        (seq, format!("{CLIENT_ID_PREFIX}{seq}"))
    }

    /// Generate an unguessable private key.
    pub fn next_private_key(&self) -> String {
        format!("{PRIVATE_KEY_PREFIX}{}", Uuid::new_v4().simple())
    }

    /// Whether `id` was ever handed out by this generator.
    pub fn was_issued(&self, id: &str) -> bool {
        parse_sequence(id).is_some_and(|seq| seq <= self.last_issued.load(Ordering::SeqCst))
    }

    /// Highest sequence number issued so far.
    pub fn last_issued(&self) -> u64 {
        self.last_issued.load(Ordering::SeqCst)
    }
}
