//! Error types for the TCP client.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type for the TCP client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the TCP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured address is not a valid, resolvable host:port.
    #[error("failed to resolve address {address}: {source}")]
    AddressResolution {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("connection is already open")]
    AlreadyOpen,

    #[error("connection is already closed")]
    AlreadyClosed,

    #[error("connection is not open")]
    NotConnected,

    /// Connecting failed: refused, unreachable, or timed out.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("short write: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Network or IO failure while reading, writing, or closing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The idle deadline set at `open` has elapsed.
    #[error("i/o deadline exceeded")]
    DeadlineExceeded,

    #[error("payload of {len} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { len: usize, limit: usize },

    #[error("response exceeds the {limit} byte limit")]
    ResponseTooLarge { limit: usize },

    #[error("write timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// The helper task running the socket call panicked or was cancelled.
    #[error("i/o task failed: {0}")]
    TaskFailed(String),
}

impl ClientError {
    /// Returns true for per-call race timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::WriteTimeout(_) | ClientError::ReadTimeout(_))
    }

    /// Returns true when the connection's idle deadline has elapsed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, ClientError::DeadlineExceeded)
    }
}
