//! Connect to a WebSocket server, send a few messages and print what comes back.
//!
//! Usage: `cargo run --example echo_client -- [host] [port] [path]`
//! Set `RUST_LOG=wsclient=debug` to see lifecycle logs.

use std::error::Error;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wsclient::ws::{CloseCode, CloseFrame};
use wsclient::{ConnectionOptions, EventKind, Notification, WebSocketClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mut options = ConnectionOptions::new();
    if let Some(host) = args.next() {
        options = options.host(host);
    }
    if let Some(port) = args.next() {
        options = options.port(port.parse()?);
    }
    if let Some(path) = args.next() {
        options = options.socket_path(path);
    }

    let client = WebSocketClient::with_options(options);
    println!("Socket: {}", client.socket_url());
    println!("HTTP:   {}", client.http_url());

    client.on(EventKind::Message, |n| {
        if let Notification::Message { data, is_binary, client, .. } = n {
            match data.as_text() {
                Some(text) => println!("[{}] message: {}", client, text),
                None => println!("[{}] message: {:?} (binary: {})", client, data, is_binary),
            }
        }
    });
    client.on(EventKind::Disconnect, |n| {
        if let Notification::Disconnect { code, reason, client, .. } = n {
            println!("[{}] disconnected: {} {}", client, code, reason);
        }
    });

    match tokio::time::timeout(Duration::from_secs(10), client.connect()).await {
        Ok(Ok(true)) => println!("Connected"),
        Ok(Ok(false)) => println!("Already connected"),
        Ok(Err(e)) => {
            println!("Error: {}", e);
            return Ok(());
        }
        Err(_) => {
            println!("Timed out");
            return Ok(());
        }
    }

    client.send_text("Hello")?;
    client.json(&serde_json::json!({ "type": "ping" }))?;
    client.send_binary(vec![1u8, 2, 3])?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    client.disconnect(Some(CloseFrame::new(CloseCode::NORMAL, "bye")));
    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(())
}
