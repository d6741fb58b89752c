//! The `{type, payload}` envelope carried by every WebSocket frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    shape::Shape,
    user::{CursorPosition, User},
};

/// A message sent between a client and the server
///
/// Relayed messages are re-encoded from this value, not forwarded byte for
/// byte. Unknown fields are dropped and every coordinate is an `f64`, so an
/// integer such as `"x":5` goes back out as `"x":5.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocketMessage {
    /// First message of a session (client → server only)
    Connect(ConnectPayload),
    /// Authoritative room snapshot (server → client only, unicast)
    InitialState(InitialStatePayload),
    /// Reserved for incremental strokes; carries no server-side effect
    DrawUpdate(String),
    AddShape(Shape),
    RemoveShape(Shape),
    UpdateShape(Shape),
    ClearCanvas,
    /// Server → client only
    UserJoined(UserJoinedPayload),
    /// Server → client only
    UserLeft(UserLeftPayload),
    UpdateDisplayName(UpdateDisplayNamePayload),
    UpdateCursorColor(UpdateCursorColorPayload),
    UpdateCursorPosition(UpdateCursorPositionPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    pub room_id: String,
    pub cursor_color: String,
    pub current_tool: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialStatePayload {
    pub shapes: Vec<Shape>,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    pub id: String,
    pub display_name: String,
    pub cursor_color: String,
    pub current_tool: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLeftPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisplayNamePayload {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCursorColorPayload {
    pub id: String,
    pub cursor_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCursorPositionPayload {
    pub id: String,
    pub cursor_position: CursorPosition,
}

/// Discriminant of a [`SocketMessage`], used for logging and routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Connect,
    InitialState,
    DrawUpdate,
    AddShape,
    RemoveShape,
    UpdateShape,
    ClearCanvas,
    UserJoined,
    UserLeft,
    UpdateDisplayName,
    UpdateCursorColor,
    UpdateCursorPosition,
}

impl MessageKind {
    /// Wire name of the message type
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Connect => "CONNECT",
            MessageKind::InitialState => "INITIAL_STATE",
            MessageKind::DrawUpdate => "DRAW_UPDATE",
            MessageKind::AddShape => "ADD_SHAPE",
            MessageKind::RemoveShape => "REMOVE_SHAPE",
            MessageKind::UpdateShape => "UPDATE_SHAPE",
            MessageKind::ClearCanvas => "CLEAR_CANVAS",
            MessageKind::UserJoined => "USER_JOINED",
            MessageKind::UserLeft => "USER_LEFT",
            MessageKind::UpdateDisplayName => "UPDATE_DISPLAY_NAME",
            MessageKind::UpdateCursorColor => "UPDATE_CURSOR_COLOR",
            MessageKind::UpdateCursorPosition => "UPDATE_CURSOR_POSITION",
        }
    }

    /// Whether a client may legitimately send this kind to the server
    pub fn is_client_originated(&self) -> bool {
        !matches!(
            self,
            MessageKind::InitialState | MessageKind::UserJoined | MessageKind::UserLeft
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SocketMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            SocketMessage::Connect(_) => MessageKind::Connect,
            SocketMessage::InitialState(_) => MessageKind::InitialState,
            SocketMessage::DrawUpdate(_) => MessageKind::DrawUpdate,
            SocketMessage::AddShape(_) => MessageKind::AddShape,
            SocketMessage::RemoveShape(_) => MessageKind::RemoveShape,
            SocketMessage::UpdateShape(_) => MessageKind::UpdateShape,
            SocketMessage::ClearCanvas => MessageKind::ClearCanvas,
            SocketMessage::UserJoined(_) => MessageKind::UserJoined,
            SocketMessage::UserLeft(_) => MessageKind::UserLeft,
            SocketMessage::UpdateDisplayName(_) => MessageKind::UpdateDisplayName,
            SocketMessage::UpdateCursorColor(_) => MessageKind::UpdateCursorColor,
            SocketMessage::UpdateCursorPosition(_) => MessageKind::UpdateCursorPosition,
        }
    }
}
