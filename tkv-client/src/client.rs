//! # TCP Connection Client
//!
//! Purpose: Own at most one live connection to the server and expose checked
//! `open`/`write`/`read`/`close` operations with per-call latency bounds.
//!
//! ## Design Principles
//! 1. **State Machine**: `Closed --open--> Open --close--> Closed`, reopenable.
//!    The connection slot is an `Option`, so "open" is exactly "slot filled".
//! 2. **Deadline Race**: Blocking socket calls run on `spawn_blocking` helpers
//!    raced against a timer. The loser is abandoned, never force-cancelled.
//! 3. **Two Bounds**: The race bounds a single call; the idle deadline armed at
//!    `open` bounds the connection, and with it any abandoned helper.
//! 4. **No Internal Locking**: Every operation takes `&mut self`, so the borrow
//!    checker serialises callers of one client.
//!
//! ## Notes
//! - With a zero idle timeout an abandoned helper stays blocked until the peer
//!   sends, closes, or the client is closed or dropped.
//! - `read` collects bytes until the peer closes the stream, so one connection
//!   carries one request/response exchange.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream as StdTcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use socket2::SockRef;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{NetworkConfig, NetworkSettings};
use crate::error::{ClientError, ClientResult};

/// Upper bound on establishing the TCP connection in `open`.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// Bytes requested per socket read; also the initial response capacity.
const READ_CHUNK: usize = 4096;

/// A live connection and the absolute deadline armed when it was opened.
struct Connection {
    // Shared with helper tasks so an abandoned call can keep using the socket.
    stream: Arc<StdTcpStream>,
    deadline: Option<Instant>,
}

/// TCP client owning at most one connection.
///
/// Callers must not share one client between concurrent requests; the
/// `&mut self` receivers make that a compile-time property.
pub struct TcpClient {
    peer_addr: SocketAddr,
    settings: NetworkSettings,
    connection: Option<Connection>,
}

impl TcpClient {
    /// Creates a closed client for the configured address.
    ///
    /// The address is resolved eagerly; no socket is created yet.
    ///
    /// # Errors
    /// Returns `ClientError::AddressResolution` if the address is not a valid
    /// host:port or resolves to nothing.
    pub fn new(config: &NetworkConfig) -> ClientResult<Self> {
        let settings = NetworkSettings::from_config(config);
        let peer_addr = resolve(&settings.address)?;
        debug!(
            address = %settings.address,
            %peer_addr,
            buffer_size = settings.buffer_size,
            idle_timeout = ?settings.idle_timeout,
            "tcp client created"
        );

        Ok(TcpClient {
            peer_addr,
            settings,
            connection: None,
        })
    }

    /// Resolved server address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Validated settings the client runs with.
    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Connects to the server and arms the idle deadline.
    ///
    /// **Logic**:
    /// 1. Reject if a connection is already held.
    /// 2. Connect under `CONNECT_TIMEOUT`.
    /// 3. Switch the socket to blocking mode and size its kernel buffers to
    ///    the configured buffer size.
    /// 4. Record `now + idle_timeout` as the deadline (none when zero).
    pub async fn open(&mut self) -> ClientResult<()> {
        if self.connection.is_some() {
            return Err(ClientError::AlreadyOpen);
        }

        let stream = self.connect().await?;
        configure_socket(&stream, self.settings.buffer_size)?;

        let deadline = if self.settings.idle_timeout.is_zero() {
            None
        } else {
            Instant::now().checked_add(self.settings.idle_timeout)
        };

        debug!(peer = %self.peer_addr, ?deadline, "connection opened");
        self.connection = Some(Connection {
            stream: Arc::new(stream),
            deadline,
        });
        Ok(())
    }

    /// Closes the connection.
    ///
    /// The client is closed afterwards even if shutting the socket down
    /// reports an error; that error is still returned.
    pub fn close(&mut self) -> ClientResult<()> {
        let connection = self.connection.take().ok_or(ClientError::AlreadyClosed)?;
        debug!(peer = %self.peer_addr, "closing connection");

        match connection.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The peer already tore the connection down.
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(ClientError::Io(err)),
        }
    }

    /// Sends one request payload.
    ///
    /// **Input**: `payload`, at most `buffer_size` bytes.
    /// **Output**: `Ok(())` once the whole payload was handed to the socket.
    ///
    /// **Logic**:
    /// 1. Reject oversized payloads before touching the socket.
    /// 2. Copy the payload into a helper task and issue a single blocking write.
    /// 3. Race the helper against the write timer; a late helper is abandoned.
    /// 4. Treat a partial write as `ShortWrite`, or as `DeadlineExceeded` when
    ///    the idle deadline cut it short.
    pub async fn write(&mut self, payload: &[u8]) -> ClientResult<()> {
        let connection = self.connection.as_ref().ok_or(ClientError::NotConnected)?;

        let limit = self.settings.buffer_size;
        if payload.len() > limit {
            return Err(ClientError::PayloadTooLarge {
                len: payload.len(),
                limit,
            });
        }

        let payload = Bytes::copy_from_slice(payload);
        let stream = Arc::clone(&connection.stream);
        let deadline = connection.deadline;
        let helper = tokio::task::spawn_blocking(move || {
            let mut writer: &StdTcpStream = &stream;
            arm_deadline(deadline, |timeout| writer.set_write_timeout(timeout))?;
            let written = writer.write(&payload).map_err(|err| map_io_error(err, deadline))?;
            if written != payload.len() {
                return Err(short_write(written, payload.len(), deadline));
            }
            Ok(written)
        });

        let written = race(helper, self.settings.write_timeout, ClientError::WriteTimeout).await?;
        debug!(peer = %self.peer_addr, bytes = written, "request written");
        Ok(())
    }

    /// Reads the response until the peer closes the stream.
    ///
    /// Responses longer than `buffer_size` fail with `ResponseTooLarge`; at
    /// most one byte past the limit is pulled off the socket.
    pub async fn read(&mut self) -> ClientResult<Vec<u8>> {
        let connection = self.connection.as_ref().ok_or(ClientError::NotConnected)?;

        let limit = self.settings.buffer_size;
        let stream = Arc::clone(&connection.stream);
        let deadline = connection.deadline;
        let helper = tokio::task::spawn_blocking(move || read_response(&stream, limit, deadline));

        let response = race(helper, self.settings.read_timeout, ClientError::ReadTimeout).await?;
        debug!(peer = %self.peer_addr, bytes = response.len(), "response read");
        Ok(response)
    }

    async fn connect(&self) -> ClientResult<StdTcpStream> {
        let connect_error = |source: io::Error| ClientError::Connect {
            address: self.settings.address.clone(),
            source,
        };

        let stream = match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(self.peer_addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(connect_error(err)),
            Err(_) => {
                return Err(connect_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "connect timed out",
                )))
            }
        };

        // Helpers perform plain blocking calls on the std socket.
        let stream = stream.into_std().map_err(connect_error)?;
        stream.set_nonblocking(false).map_err(connect_error)?;
        Ok(stream)
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        // Unblocks any abandoned helper still parked on the socket.
        if let Some(connection) = self.connection.take() {
            let _ = connection.stream.shutdown(Shutdown::Both);
        }
    }
}

fn resolve(address: &str) -> ClientResult<SocketAddr> {
    let resolution_error = |source: io::Error| ClientError::AddressResolution {
        address: address.to_string(),
        source,
    };

    address
        .to_socket_addrs()
        .map_err(resolution_error)?
        .next()
        .ok_or_else(|| {
            resolution_error(io::Error::new(
                io::ErrorKind::NotFound,
                "address resolved to no socket addresses",
            ))
        })
}

fn configure_socket(stream: &StdTcpStream, buffer_size: usize) -> io::Result<()> {
    // Disable Nagle so small requests leave immediately.
    stream.set_nodelay(true)?;

    let socket = SockRef::from(stream);
    socket.set_send_buffer_size(buffer_size)?;
    socket.set_recv_buffer_size(buffer_size)?;
    Ok(())
}

/// Sets the socket timeout to whatever is left of the idle deadline.
fn arm_deadline(
    deadline: Option<Instant>,
    set_timeout: impl FnOnce(Option<Duration>) -> io::Result<()>,
) -> ClientResult<()> {
    let Some(deadline) = deadline else {
        return Ok(());
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(ClientError::DeadlineExceeded);
    }
    set_timeout(Some(remaining))?;
    Ok(())
}

/// Reads until EOF, re-arming the remaining idle deadline before every chunk.
///
/// Socket timeouts restart on each received segment, so the deadline is
/// recomputed from the stored instant instead of being armed once.
fn read_response(
    mut reader: &StdTcpStream,
    limit: usize,
    deadline: Option<Instant>,
) -> ClientResult<Vec<u8>> {
    let mut response = Vec::with_capacity(limit.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        arm_deadline(deadline, |timeout| reader.set_read_timeout(timeout))?;

        // Never pull more than one byte past the limit off the socket.
        let wanted = (limit - response.len()).saturating_add(1).min(READ_CHUNK);
        let n = match reader.read(&mut chunk[..wanted]) {
            Ok(0) => return Ok(response),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(map_io_error(err, deadline)),
        };

        if response.len() + n > limit {
            return Err(ClientError::ResponseTooLarge { limit });
        }
        response.extend_from_slice(&chunk[..n]);
    }
}

/// Classifies a partial write on a blocking socket.
///
/// The kernel returns a short count when the send timeout fires mid-write,
/// so a short count past the idle deadline is a deadline failure.
fn short_write(written: usize, expected: usize, deadline: Option<Instant>) -> ClientError {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => ClientError::DeadlineExceeded,
        _ => ClientError::ShortWrite { written, expected },
    }
}

fn map_io_error(err: io::Error, deadline: Option<Instant>) -> ClientError {
    // Socket timeouts surface as WouldBlock on Unix and TimedOut on Windows.
    let timed_out = matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut);
    if deadline.is_some() && timed_out {
        ClientError::DeadlineExceeded
    } else {
        ClientError::Io(err)
    }
}

/// Waits for `helper` or `limit`, whichever comes first.
///
/// A zero `limit` disables the timer. On timeout the helper keeps running
/// detached until its blocking call returns.
async fn race<T>(
    helper: JoinHandle<ClientResult<T>>,
    limit: Duration,
    on_timeout: fn(Duration) -> ClientError,
) -> ClientResult<T> {
    let joined = if limit.is_zero() {
        helper.await
    } else {
        match tokio::time::timeout(limit, helper).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(?limit, "socket call timed out; abandoning helper task");
                return Err(on_timeout(limit));
            }
        }
    };

    joined.map_err(|err| ClientError::TaskFailed(err.to_string()))?
}
