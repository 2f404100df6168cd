//! WebSocket message types.

use bytes::Bytes;
use tokio_tungstenite::tungstenite;

/// Outgoing or incoming WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Text message (UTF-8)
    Text(String),
    /// Binary message
    Binary(Bytes),
    /// Ping frame
    Ping(Vec<u8>),
    /// Pong frame
    Pong(Vec<u8>),
    /// Close frame with optional code and reason
    Close(Option<CloseFrame>),
}

/// Close frame data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    /// Close code (RFC 6455)
    pub code: CloseCode,
    /// Close reason (optional UTF-8 string)
    pub reason: String,
}

impl CloseFrame {
    pub fn new(code: CloseCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

/// WebSocket close codes (RFC 6455).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseCode(pub u16);

impl CloseCode {
    /// Normal closure
    pub const NORMAL: Self = Self(1000);
    /// Endpoint going away
    pub const GOING_AWAY: Self = Self(1001);
    /// Protocol error
    pub const PROTOCOL_ERROR: Self = Self(1002);
    /// No status received
    pub const NO_STATUS: Self = Self(1005);
    /// Abnormal closure (never sent on the wire)
    pub const ABNORMAL: Self = Self(1006);
    /// Internal server error
    pub const INTERNAL_ERROR: Self = Self(1011);
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.0
    }
}

impl Message {
    pub fn is_text(&self) -> bool {
        matches!(self, Message::Text(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Message::Binary(_))
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Message::Close(_))
    }

    /// Try to get as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as binary data.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Message::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Message> for tungstenite::Message {
    fn from(msg: Message) -> Self {
        match msg {
            Message::Text(s) => tungstenite::Message::Text(s),
            Message::Binary(b) => tungstenite::Message::Binary(b.to_vec()),
            Message::Ping(d) => tungstenite::Message::Ping(d),
            Message::Pong(d) => tungstenite::Message::Pong(d),
            Message::Close(frame) => {
                let tung_frame = frame.map(|f| tungstenite::protocol::CloseFrame {
                    code: tungstenite::protocol::frame::coding::CloseCode::from(f.code.0),
                    reason: f.reason.into(),
                });
                tungstenite::Message::Close(tung_frame)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_types() {
        let text = Message::Text("hello".into());
        assert!(text.is_text());
        assert!(!text.is_binary());
        assert_eq!(text.as_text(), Some("hello"));

        let binary = Message::Binary(Bytes::from_static(b"data"));
        assert!(binary.is_binary());
        assert_eq!(binary.as_bytes(), Some(&b"data"[..]));

        assert!(Message::Close(None).is_close());
    }

    #[test]
    fn test_close_codes() {
        assert_eq!(CloseCode::NORMAL.0, 1000);
        assert_eq!(CloseCode::ABNORMAL.0, 1006);

        let code: u16 = CloseCode::GOING_AWAY.into();
        assert_eq!(code, 1001);
    }

    #[test]
    fn test_close_frame_conversion() {
        let frame = CloseFrame::new(CloseCode::from(4001), "bye");
        match tungstenite::Message::from(Message::Close(Some(frame))) {
            tungstenite::Message::Close(Some(tung)) => {
                assert_eq!(u16::from(tung.code), 4001);
                assert_eq!(tung.reason, "bye");
            }
            other => panic!("Expected close frame, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_conversion() {
        let tung: tungstenite::Message = Message::Binary(Bytes::from_static(b"\x00\x01")).into();
        assert!(tung.is_binary());
        assert_eq!(tung.into_data(), vec![0x00, 0x01]);
    }
}
