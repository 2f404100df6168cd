//! Socket transports.
//!
//! A [`Transport`] takes a [`SocketDriver`] and brings it to life: it opens
//! the connection, reports lifecycle transitions and pumps frames in both
//! directions. [`TungsteniteTransport`] does this over tokio-tungstenite.

use super::message::{CloseCode, Message};
use super::socket::SocketDriver;
use crate::base::neterror::NetError;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite};

/// Starts the wire side of a socket.
///
/// `start` must not block; it hands the driver off (typically to a spawned
/// task) and returns.
pub trait Transport: Send + Sync {
    fn start(&self, driver: SocketDriver);
}

/// Default transport backed by tokio-tungstenite.
///
/// Each socket runs on its own tokio task, so `start` must be called from
/// within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteTransport;

impl Transport for TungsteniteTransport {
    fn start(&self, driver: SocketDriver) {
        tokio::spawn(run(driver));
    }
}

async fn run(mut driver: SocketDriver) {
    let url = driver.url().clone();
    tracing::debug!(url = %url, "opening websocket");

    let connected = tokio::select! {
        res = connect_async(url.as_str()) => res,
        cmd = driver.next_outgoing() => {
            // Closed (or dropped) before the handshake finished.
            if cmd.is_some() {
                tracing::debug!(url = %url, "websocket closed before open");
            }
            driver.closed(CloseCode::ABNORMAL.0, "", false);
            return;
        }
    };

    let ws_stream = match connected {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            let err = NetError::from_ws_error(&e);
            tracing::debug!(url = %url, error = %e, code = err.as_i32(), "websocket connect failed");
            driver.errored(e.to_string());
            driver.closed(CloseCode::ABNORMAL.0, "", false);
            return;
        }
    };

    driver.opened();
    let (mut sink, mut stream) = ws_stream.split();
    let mut close_frame: Option<(u16, String)> = None;

    loop {
        tokio::select! {
            cmd = driver.next_outgoing() => {
                let Some(msg) = cmd else {
                    // Handle dropped: leave politely.
                    let _ = sink.send(Message::Close(None).into()).await;
                    driver.closed(CloseCode::NO_STATUS.0, "", true);
                    break;
                };
                tracing::trace!(url = %url, close = msg.is_close(), "websocket send");
                if let Err(e) = sink.send(msg.into()).await {
                    tracing::debug!(url = %url, error = %e, "websocket send error");
                    driver.errored(e.to_string());
                    driver.closed(CloseCode::ABNORMAL.0, "", false);
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    tracing::trace!(url = %url, len = text.len(), "websocket text");
                    driver.text(text.to_string());
                }
                Some(Ok(tungstenite::Message::Binary(data))) => {
                    tracing::trace!(url = %url, len = data.len(), "websocket binary");
                    driver.binary(data.into());
                }
                Some(Ok(tungstenite::Message::Close(frame))) => {
                    driver.closing();
                    close_frame = frame.map(|f| (u16::from(f.code), f.reason.to_string()));
                }
                // Ping/pong are answered by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(url = %url, error = %e, "websocket recv error");
                    match e {
                        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                            finish(&driver, close_frame.take());
                        }
                        e => {
                            driver.errored(e.to_string());
                            driver.closed(CloseCode::ABNORMAL.0, "", false);
                        }
                    }
                    break;
                }
                None => {
                    finish(&driver, close_frame.take());
                    break;
                }
            }
        }
    }

    tracing::debug!(url = %url, "websocket closed");
}

/// Report the end of a stream that was not cut by an error.
fn finish(driver: &SocketDriver, close_frame: Option<(u16, String)>) {
    match close_frame {
        Some((code, reason)) => driver.closed(code, reason, true),
        None => driver.closed(CloseCode::NO_STATUS.0, "", true),
    }
}
