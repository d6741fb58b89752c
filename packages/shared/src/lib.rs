//! Code shared by the Chalkboard server and client.
//!
//! - `protocol`: WebSocket wire messages and their codec
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod protocol;
pub mod time;
