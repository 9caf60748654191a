//! # Hub Configuration
//!
//! - `max_pending_calls`: capacity of the pending synchronous-call table
//! - `max_timeout_secs`: hard ceiling on any synchronous wait
//!
//! Both have sane defaults and can be overridden from the environment.

use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding `max_pending_calls`.
pub const ENV_MAX_PENDING_CALLS: &str = "SAMP_HUB_MAX_PENDING_CALLS";

/// Environment variable overriding `max_timeout_secs`.
pub const ENV_MAX_TIMEOUT_SECS: &str = "SAMP_HUB_MAX_TIMEOUT_SECS";

/// Hub configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Public id of the hub's own client (default: `hub`).
    pub hub_id: String,

    /// Display name advertised in the hub client's metadata.
    pub hub_name: String,

    /// Maximum simultaneously pending synchronous calls (default: 100).
    ///
    /// When exceeded, the oldest pending calls are aborted.
    pub max_pending_calls: usize,

    /// Maximum wait for a synchronous call in seconds (default: 43200 = 12h).
    pub max_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_id: "hub".to_string(),
            hub_name: "Hub".to_string(),
            max_pending_calls: 100,
            max_timeout_secs: 43_200,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_pending_calls must be at least 1")]
    ZeroPendingCalls,

    #[error("max_timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("Hub id {0:?} is empty, not 7-bit clean, or collides with client ids")]
    BadHubId(String),

    #[error("Message id key rejected: {0}")]
    MessageIdKey(String),
}

impl HubConfig {
    /// Defaults overridden by `SAMP_HUB_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_MAX_PENDING_CALLS) {
            match raw.parse() {
                Ok(n) => {
                    config.max_pending_calls = n;
                    info!(max_pending_calls = n, "Loaded pending-call limit from environment");
                }
                Err(_) => warn!(value = %raw, "{} must be a positive integer", ENV_MAX_PENDING_CALLS),
            }
        }
        if let Ok(raw) = env::var(ENV_MAX_TIMEOUT_SECS) {
            match raw.parse() {
                Ok(n) => {
                    config.max_timeout_secs = n;
                    info!(max_timeout_secs = n, "Loaded call timeout ceiling from environment");
                }
                Err(_) => warn!(value = %raw, "{} must be a positive integer", ENV_MAX_TIMEOUT_SECS),
            }
        }

        config
    }

    /// Check values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pending_calls == 0 {
            return Err(ConfigError::ZeroPendingCalls);
        }
        if self.max_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let clean = !self.hub_id.is_empty() && self.hub_id.bytes().all(|b| (0x21..=0x7e).contains(&b));
        if !clean || super::identifiers::parse_sequence(&self.hub_id).is_some() {
            return Err(ConfigError::BadHubId(self.hub_id.clone()));
        }
        Ok(())
    }

    /// The timeout ceiling as a `Duration`.
    pub fn max_timeout(&self) -> Duration {
        Duration::from_secs(self.max_timeout_secs)
    }

    /// Clamp a requested wait into `[0, max]`, where 0 (or less) means "up to max".
    pub fn effective_timeout(&self, requested_secs: i64) -> Duration {
        match u64::try_from(requested_secs) {
            Ok(0) | Err(_) => self.max_timeout(),
            Ok(secs) => Duration::from_secs(secs.min(self.max_timeout_secs)),
        }
    }
}
