//! # TinyKV TCP Client
//!
//! Purpose: Open a single TCP connection to a key-value server, send one
//! opaque request, and collect the response, all under size and time bounds.
//!
//! ## Design Principles
//! 1. **Explicit Lifecycle**: `open`/`close` are checked transitions; misuse is
//!    an error, never a silent no-op.
//! 2. **Bounded Calls**: Each blocking socket call runs on a helper task raced
//!    against a timer, so callers get a worst-case latency per call.
//! 3. **Bounded Leftovers**: The idle deadline set at `open` also caps how long
//!    an abandoned helper can stay blocked.
//! 4. **Validated Config**: Raw settings are validated once at construction.

mod client;
mod config;
mod error;

pub use client::{TcpClient, CONNECT_TIMEOUT};
pub use config::{
    NetworkConfig, NetworkSettings, DEFAULT_ADDRESS, DEFAULT_BUFFER_SIZE, DEFAULT_READ_TIMEOUT,
    DEFAULT_WRITE_TIMEOUT,
};
pub use error::{ClientError, ClientResult};
