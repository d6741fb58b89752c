//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },
}

/// Errors raised by a `RoomRepository`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The room does not exist (never joined, or emptied and removed)
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// The user is not a member of the room
    #[error("Member '{0}' not found")]
    MemberNotFound(String),

    /// The member has been taken over by a newer connection
    #[error("Member '{0}' is bound to a newer connection")]
    StaleConnection(String),
}

/// Errors raised by a `MessagePusher`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The connection's outbound channel is closed
    #[error("Failed to push message to connection '{0}': channel closed")]
    ChannelClosed(String),
}
