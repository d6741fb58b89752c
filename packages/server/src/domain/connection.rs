//! Server-side handle to one live transport connection.
//!
//! The handle does not own the socket. It owns the sending half of the
//! connection's outbound queue; a writer task on the UI side drains the queue
//! into the socket. Closing a handle therefore means enqueueing a close frame.

use std::fmt;

use tokio::sync::mpsc;

use super::{ConnectionId, error::MessagePushError};

/// Frame queued for delivery to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Serialized `SocketMessage`
    Text(String),
    /// Close the connection with the given code and reason
    Close { code: u16, reason: String },
}

/// Sending half of a connection's outbound queue
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// Why the server is closing a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The same user joined the same room from a newer connection
    Replaced,
}

impl CloseReason {
    /// WebSocket close code
    pub fn code(&self) -> u16 {
        match self {
            CloseReason::Replaced => 1000,
        }
    }

    /// Human-readable reason sent in the close frame
    pub fn reason(&self) -> &'static str {
        match self {
            CloseReason::Replaced => "Replaced by new connection",
        }
    }
}

/// Exclusive, non-owning reference to a live connection.
///
/// Equality is by `ConnectionId` only.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: PusherChannel) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text frame for this connection
    pub fn send_text(&self, content: &str) -> Result<(), MessagePushError> {
        self.sender
            .send(OutboundFrame::Text(content.to_string()))
            .map_err(|_| MessagePushError::ChannelClosed(self.id.to_string()))
    }

    /// Queue a close frame for this connection.
    ///
    /// A connection that is already gone is not an error.
    pub fn close(&self, reason: CloseReason) {
        let frame = OutboundFrame::Close {
            code: reason.code(),
            reason: reason.reason().to_string(),
        };
        if self.sender.send(frame).is_err() {
            tracing::debug!("Connection '{}' already closed", self.id);
        }
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish()
    }
}
