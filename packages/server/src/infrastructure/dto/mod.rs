//! Data transfer objects and their conversions from domain models.
//!
//! WebSocket frames use `chalkboard_shared::protocol` directly; this module
//! only adds the HTTP API payloads and the domain ↔ wire conversions.

pub mod conversion;
pub mod http;
