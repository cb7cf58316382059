//! # Client Configuration File
//!
//! Purpose: Load `client.toml` from the config directory into the values the
//! logger and the TCP client are built from.
//!
//! ## Notes
//! - Every key is optional; the network layer fills in its own defaults.
//! - Durations accept `ms`/`s`/`m`/`h` suffixes or `infinite`.
//!
//! ```toml
//! [logging]
//! level = "info"
//! output = "stdout"
//!
//! [network]
//! address = "127.0.0.1:3223"
//! max_message_size = "4kb"
//! idle_timeout = "infinite"
//! read_timeout = "5s"
//! write_timeout = "5s"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use tkv_client::NetworkConfig;
use tkv_common::parse_duration;

/// File name looked up inside the config directory.
pub const CONFIG_FILE: &str = "client.toml";

/// Logger settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
    /// `stdout` or `stderr`.
    pub output: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileNetworkConfig {
    address: String,
    max_message_size: String,
    idle_timeout: Option<String>,
    read_timeout: Option<String>,
    write_timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    logging: LoggerConfig,
    network: FileNetworkConfig,
}

/// Client application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub logging: LoggerConfig,
    pub network: NetworkConfig,
}

impl ClientConfig {
    /// Loads `<dir>/client.toml`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        let network = file.network;

        Ok(ClientConfig {
            logging: file.logging,
            network: NetworkConfig {
                address: network.address,
                max_message_size: network.max_message_size,
                idle_timeout: duration_field("network.idle_timeout", network.idle_timeout.as_deref())?
                    .unwrap_or(Duration::ZERO),
                read_timeout: duration_field("network.read_timeout", network.read_timeout.as_deref())?,
                write_timeout: duration_field("network.write_timeout", network.write_timeout.as_deref())?,
            },
        })
    }
}

fn duration_field(key: &str, raw: Option<&str>) -> Result<Option<Duration>> {
    raw.map(|value| parse_duration(value).ok_or_else(|| anyhow!("{key}: invalid duration {value:?}")))
        .transpose()
}
