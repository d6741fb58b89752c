//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Reason the server sends when it closes a superseded connection
pub const REPLACED_CLOSE_REASON: &str = "Replaced by new connection";

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the error requires immediate exit (e.g., Replaced),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Replaced)
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Classify a close frame sent by the server
pub fn close_error(code: u16, reason: &str) -> ClientError {
    if code == 1000 && reason == REPLACED_CLOSE_REASON {
        ClientError::Replaced
    } else {
        ClientError::ConnectionLost(format!("closed by server (code {})", code))
    }
}

/// Build the session URL for a room: `{base}/{room}`
pub fn session_url(base_url: &str, room: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), room)
}
