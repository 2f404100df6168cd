/// The current state of a socket connection.
/// This matches the WebSocket `readyState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ReadyState {
    /// The opening handshake is in progress.
    #[default]
    Connecting = 0,

    /// The connection is open and ready to communicate.
    Open = 1,

    /// The closing handshake is in progress.
    Closing = 2,

    /// The connection is closed or could not be opened.
    Closed = 3,
}

impl ReadyState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the socket has reached its terminal state.
    pub fn is_closed(self) -> bool {
        self == ReadyState::Closed
    }
}

impl From<u8> for ReadyState {
    /// Out-of-range values are treated as closed.
    fn from(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}
