//! Tracing subscriber setup for the binary.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggerConfig;

/// Level used when the config names none or an unknown one.
pub const DEFAULT_LEVEL: Level = Level::DEBUG;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Resolves the configured level, falling back to `DEFAULT_LEVEL`.
pub fn parse_level(raw: &str) -> Level {
    raw.trim().parse().unwrap_or(DEFAULT_LEVEL)
}

pub fn parse_output(raw: &str) -> LogOutput {
    if raw.trim().eq_ignore_ascii_case("stderr") {
        LogOutput::Stderr
    } else {
        LogOutput::Stdout
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LoggerConfig) -> Result<()> {
    let level = parse_level(&config.level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let builder = fmt().with_env_filter(filter).with_target(false);
    let installed = match parse_output(&config.output) {
        LogOutput::Stdout => builder.with_writer(std::io::stdout).try_init(),
        LogOutput::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
