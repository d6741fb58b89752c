//! Error types for the whiteboard client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server replaced this connection with a newer one for the same user
    #[error("Connection replaced by a newer session for the same user")]
    Replaced,

    /// Could not establish the WebSocket connection
    #[error("Failed to connect: {0}")]
    ConnectFailed(String),

    /// An established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
