use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tkv_cli::app::{ClientApp, PROMPT};
use tkv_cli::config::ClientConfig;
use tkv_client::{NetworkConfig, TcpClient};
use tkv_common::emitter_awaiter;

/// Answers every line with `echo: <line>` and closes the connection.
async fn spawn_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (reader, mut writer) = stream.into_split();
                let mut line = String::new();
                if BufReader::new(reader).read_line(&mut line).await.unwrap_or(0) == 0 {
                    return;
                }
                let reply = format!("echo: {}", line.trim_end());
                let _ = writer.write_all(reply.as_bytes()).await;
            });
        }
    });

    addr
}

fn client_for(addr: SocketAddr) -> TcpClient {
    TcpClient::new(&NetworkConfig {
        address: addr.to_string(),
        read_timeout: Some(Duration::from_secs(2)),
        write_timeout: Some(Duration::from_secs(2)),
        ..NetworkConfig::default()
    })
    .expect("client")
}

#[tokio::test]
async fn answers_each_request_until_eof() {
    let addr = spawn_echo_server().await;
    let (_shutdown, shutdown_requested) = emitter_awaiter();
    let mut app = ClientApp::new(client_for(addr), shutdown_requested);

    let input: &[u8] = b"get alpha\n\nset beta 1\n";
    let mut output = Vec::new();
    app.run(input, &mut output).await.expect("run");

    let output = String::from_utf8(output).unwrap();
    let expected = format!("{PROMPT}echo: get alpha\n{PROMPT}{PROMPT}echo: set beta 1\n{PROMPT}");
    assert_eq!(output, expected);
}

#[tokio::test]
async fn failed_requests_keep_the_loop_alive() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let (_shutdown, shutdown_requested) = emitter_awaiter();
    let mut app = ClientApp::new(client_for(addr), shutdown_requested);

    let input: &[u8] = b"first\nsecond\n";
    let mut output = Vec::new();
    app.run(input, &mut output).await.expect("run");

    assert_eq!(String::from_utf8(output).unwrap(), PROMPT.repeat(3));
}

#[tokio::test]
async fn shutdown_signal_stops_waiting_for_input() {
    let addr = spawn_echo_server().await;
    let (shutdown, shutdown_requested) = emitter_awaiter();
    let mut app = ClientApp::new(client_for(addr), shutdown_requested);

    // Keep the writing half alive so the input never reaches EOF.
    let (_stdin_writer, stdin_reader) = tokio::io::duplex(64);
    let handle = tokio::spawn(async move {
        let mut output = Vec::new();
        app.run(BufReader::new(stdin_reader), &mut output).await?;
        Ok::<_, anyhow::Error>(output)
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.emit();

    let output = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop stopped")
        .expect("task joined")
        .expect("run");
    assert_eq!(String::from_utf8(output).unwrap(), PROMPT);
}

#[test]
fn loads_config_from_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("client.toml"),
        r#"
[logging]
level = "info"

[network]
address = "127.0.0.1:3223"
max_message_size = "1 kb"
idle_timeout = "infinite"
"#,
    )
    .expect("write config");

    let config = ClientConfig::load(dir.path()).expect("load");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.network.address, "127.0.0.1:3223");
    assert_eq!(config.network.idle_timeout, Duration::ZERO);

    let client = TcpClient::new(&config.network).expect("client");
    assert_eq!(client.settings().buffer_size, 1024);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ClientConfig::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("client.toml"));
}
