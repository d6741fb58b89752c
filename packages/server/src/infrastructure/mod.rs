//! Infrastructure layer: concrete implementations of the domain traits and
//! conversions between domain models and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
