//! # Hub Telemetry
//!
//! Structured logging for processes embedding the hub.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_telemetry::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SAMP_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SAMP_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `SAMP_LOG_TARGETS` | `true` | Include the module target in each line |

mod config;
mod logging;

pub use config::LoggingConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    BadFilter { filter: String, reason: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}
