//! WebSocket wire protocol shared by server and clients.
//!
//! Frames are JSON objects of the form `{"type": ..., "payload": ...}`
//! (`CLEAR_CANVAS` carries no payload). Direction constraints such as
//! "`CONNECT` is client → server only" are enforced by the connection
//! handler, not here.

pub mod codec;
pub mod message;
pub mod shape;
pub mod user;

pub use codec::{CodecError, decode, encode};
pub use message::{
    ConnectPayload, InitialStatePayload, MessageKind, SocketMessage, UpdateCursorColorPayload,
    UpdateCursorPositionPayload, UpdateDisplayNamePayload, UserJoinedPayload, UserLeftPayload,
};
pub use shape::{BoxShape, CircleShape, DEFAULT_COLOR, PathShape, Shape, ShapeKind};
pub use user::{CursorPosition, DEFAULT_CURSOR_COLOR, Tool, UnknownTool, User};
