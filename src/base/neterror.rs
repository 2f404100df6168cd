use thiserror::Error;

/// Network error conditions surfaced by the socket client.
///
/// Numeric codes follow Chromium's `net_error_list.h` where an equivalent
/// exists; crate-specific conditions use the -900 block.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection reset")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Message too big")]
    MsgTooBig,
    #[error("WebSocket protocol error")]
    WsProtocolError,

    // URL Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,

    // Client Errors
    #[error("Invalid message payload")]
    InvalidMessage,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::SslProtocolError => -107,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,
            NetError::MsgTooBig => -142,
            NetError::WsProtocolError => -145,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,

            NetError::InvalidMessage => -910,
            NetError::Unknown(code) => *code,
        }
    }

    /// Map a tungstenite failure onto the closest network error.
    pub fn from_ws_error(err: &tokio_tungstenite::tungstenite::Error) -> Self {
        use std::io::ErrorKind;
        use tokio_tungstenite::tungstenite::Error as WsError;

        match err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => NetError::ConnectionClosed,
            WsError::Io(io) => match io.kind() {
                ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
                ErrorKind::ConnectionReset => NetError::ConnectionReset,
                ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
                ErrorKind::TimedOut => NetError::ConnectionTimedOut,
                ErrorKind::NotConnected => NetError::SocketNotConnected,
                _ => NetError::ConnectionFailed,
            },
            WsError::Tls(_) => NetError::SslProtocolError,
            WsError::Capacity(_) => NetError::MsgTooBig,
            WsError::Protocol(_) => NetError::WsProtocolError,
            WsError::Url(_) => NetError::InvalidUrl,
            _ => NetError::ConnectionFailed,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -107 => NetError::SslProtocolError,
            -112 => NetError::SocketNotConnected,
            -118 => NetError::ConnectionTimedOut,
            -142 => NetError::MsgTooBig,
            -145 => NetError::WsProtocolError,

            -300 => NetError::InvalidUrl,
            -302 => NetError::UnknownUrlScheme,

            -910 => NetError::InvalidMessage,
            _ => NetError::Unknown(code),
        }
    }
}
