//! Domain factories for creating identifiers.

use super::{ConnectionId, UserId};

/// Factory for generating UserId instances.
///
/// Used when a client connects without supplying an id of its own.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Generate a new UserId with a random UUID v4.
    pub fn generate() -> UserId {
        UserId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}
