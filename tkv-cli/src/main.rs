//! # TinyKV Client
//!
//! Interactive client: reads requests from stdin and prints server responses
//! until EOF or Ctrl+C.
//!
//! ```text
//! tkv-client --config ./config
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use tkv_cli::app::ClientApp;
use tkv_cli::args::Args;
use tkv_cli::config::ClientConfig;
use tkv_cli::logging::init_tracing;
use tkv_client::TcpClient;
use tkv_common::emitter_awaiter;

/// How long the application loop gets to finish after Ctrl+C.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args));
    // A pending stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_background();
    result
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::load(&args.config)?;
    init_tracing(&config.logging)?;

    let client = TcpClient::new(&config.network).context("failed to create tcp client")?;
    info!(peer = %client.peer_addr(), "client configured");

    let (shutdown, shutdown_requested) = emitter_awaiter();
    let mut app = ClientApp::new(client, shutdown_requested);
    let mut task = tokio::spawn(async move {
        app.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    });

    tokio::select! {
        joined = &mut task => return joined.context("client application panicked")?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("shutdown signal received");
        }
    }

    shutdown.emit();
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await {
        Ok(joined) => joined.context("client application panicked")?,
        Err(_) => bail!("shutdown timeout"),
    }
}
