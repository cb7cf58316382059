//! # Network Configuration
//!
//! Purpose: Validate the raw network settings handed over by the config loader
//! into the immutable values a `TcpClient` runs with.
//!
//! ## Design Principles
//! 1. **Fallback Defaults**: Missing or unparseable values fall back to fixed
//!    defaults instead of failing construction.
//! 2. **Validate Once**: Validation runs at construction and never again
//!    during the connection's life.

use std::time::Duration;

use tkv_common::parse_buffer_size;

/// Address used when the config leaves `address` empty.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3223";

/// Buffer size used when `max_message_size` is missing or invalid.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Race timer applied to each `read` unless configured otherwise.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Race timer applied to each `write` unless configured otherwise.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw network configuration, as supplied by the config loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Server address, e.g. "127.0.0.1:3223". Empty means the default.
    pub address: String,
    /// Human-readable size limit for one request or response, e.g. "4kb".
    pub max_message_size: String,
    /// Connection lifetime measured from `open`. Zero means no deadline.
    pub idle_timeout: Duration,
    /// Optional per-call read timer. Zero disables the timer.
    pub read_timeout: Option<Duration>,
    /// Optional per-call write timer. Zero disables the timer.
    pub write_timeout: Option<Duration>,
}

/// Validated network settings used by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub address: String,
    pub buffer_size: usize,
    pub idle_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl NetworkSettings {
    /// Validates a raw config, substituting defaults where needed.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let address = if config.address.is_empty() {
            DEFAULT_ADDRESS.to_string()
        } else {
            config.address.clone()
        };

        let buffer_size = parse_buffer_size(&config.max_message_size).unwrap_or(DEFAULT_BUFFER_SIZE);

        NetworkSettings {
            address,
            buffer_size,
            idle_timeout: config.idle_timeout,
            read_timeout: config.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
            write_timeout: config.write_timeout.unwrap_or(DEFAULT_WRITE_TIMEOUT),
        }
    }
}

impl From<&NetworkConfig> for NetworkSettings {
    fn from(config: &NetworkConfig) -> Self {
        NetworkSettings::from_config(config)
    }
}
