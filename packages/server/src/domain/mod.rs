//! Domain layer for the whiteboard server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use connection::{CloseReason, ConnectionHandle, OutboundFrame, PusherChannel};
pub use entity::{Member, MemberUpdate, Room, RoomSnapshot, ShapeOperation};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, UserIdFactory};
pub use message_pusher::MessagePusher;
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, RoomId, Timestamp, UserId};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
