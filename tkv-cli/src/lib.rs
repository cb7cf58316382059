//! Interactive command-line client for a TinyKV server.
//!
//! Each module is thin glue around `tkv-client`:
//!
//! - [`args`] parses the command-line flags.
//! - [`config`] loads `client.toml` from the config directory.
//! - [`logging`] installs the `tracing` subscriber.
//! - [`app`] runs the prompt loop, one connection per request.

pub mod app;
pub mod args;
pub mod config;
pub mod logging;
