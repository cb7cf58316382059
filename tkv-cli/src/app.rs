//! # Client Application Loop
//!
//! Purpose: Read requests line by line, send each over a fresh connection, and
//! print the server's response.
//!
//! ## Design Principles
//! 1. **One Connection Per Request**: The server closes the stream to end a
//!    response, so every request runs `open -> write -> read -> close`.
//! 2. **Keep Going**: Request failures are logged and the prompt comes back.
//! 3. **Cooperative Shutdown**: The loop stops at the next prompt once the
//!    shutdown signal fires.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use tkv_client::{ClientResult, TcpClient};
use tkv_common::Awaiter;

/// Prompt printed before each request.
pub const PROMPT: &str = "[KV client] > ";

pub struct ClientApp {
    client: TcpClient,
    shutdown: Awaiter,
}

impl ClientApp {
    pub fn new(client: TcpClient, shutdown: Awaiter) -> Self {
        ClientApp { client, shutdown }
    }

    /// Runs the prompt loop until `input` hits EOF or shutdown is requested.
    ///
    /// Errors are returned only for failures on `input`/`output` themselves.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Press (Ctrl+C) to shutdown application");
        let mut lines = input.lines();

        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let line = tokio::select! {
                _ = self.shutdown.wait() => {
                    debug!("shutdown requested, leaving client loop");
                    break;
                }
                line = lines.next_line() => line.context("failed to read request")?,
            };

            let Some(request) = line else {
                debug!("exit client application loop");
                break;
            };
            if request.trim().is_empty() {
                continue;
            }

            match self.exchange(request).await {
                Ok(response) => {
                    output.write_all(&response).await?;
                    output.write_all(b"\n").await?;
                }
                Err(err) => error!(%err, "request failed"),
            }
        }

        output.flush().await?;
        Ok(())
    }

    async fn exchange(&mut self, mut request: String) -> ClientResult<Vec<u8>> {
        request.push('\n');

        self.client.open().await?;
        let response = self.send(request).await;
        if let Err(err) = self.client.close() {
            warn!(%err, "failed to close connection");
        }
        response
    }

    async fn send(&mut self, request: String) -> ClientResult<Vec<u8>> {
        self.client.write(request.as_bytes()).await?;
        self.client.read().await
    }
}
