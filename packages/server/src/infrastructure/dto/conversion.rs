//! Conversion logic between domain models, wire messages and HTTP DTOs.

use chalkboard_shared::{
    protocol::{SocketMessage, User, UserJoinedPayload},
    time::timestamp_to_rfc3339,
};

use crate::domain::{Member, MemberUpdate, Room, RoomId, ShapeOperation};
use crate::infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto};

// ========================================
// Domain Entity → Wire message
// ========================================

/// INITIAL_STATE の users 要素に変換する
pub fn member_to_user(member: &Member, room_id: &RoomId) -> User {
    User {
        id: member.id.as_str().to_string(),
        display_name: member.display_name.clone(),
        current_room_id: room_id.as_str().to_string(),
        current_tool: member.current_tool,
        cursor_color: member.cursor_color.clone(),
        cursor_position: member.cursor_position,
    }
}

impl From<&Member> for UserJoinedPayload {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.as_str().to_string(),
            display_name: member.display_name.clone(),
            cursor_color: member.cursor_color.clone(),
            current_tool: member.current_tool.as_str().to_string(),
        }
    }
}

// ========================================
// Wire message → Domain operation
// ========================================

/// 図形を変更するメッセージであれば対応する ShapeOperation を返す
pub fn shape_operation(message: &SocketMessage) -> Option<ShapeOperation> {
    match message {
        SocketMessage::AddShape(shape) => Some(ShapeOperation::Add(shape.clone())),
        SocketMessage::UpdateShape(shape) => Some(ShapeOperation::Update(shape.clone())),
        SocketMessage::RemoveShape(shape) => Some(ShapeOperation::Remove(shape.id().to_string())),
        SocketMessage::ClearCanvas => Some(ShapeOperation::Clear),
        _ => None,
    }
}

/// プレゼンス更新メッセージであれば (対象ユーザー ID, 更新内容) を返す
pub fn member_update(message: &SocketMessage) -> Option<(&str, MemberUpdate)> {
    match message {
        SocketMessage::UpdateDisplayName(payload) => Some((
            payload.id.as_str(),
            MemberUpdate::DisplayName(payload.display_name.clone()),
        )),
        SocketMessage::UpdateCursorColor(payload) => Some((
            payload.id.as_str(),
            MemberUpdate::CursorColor(payload.cursor_color.clone()),
        )),
        SocketMessage::UpdateCursorPosition(payload) => Some((
            payload.id.as_str(),
            MemberUpdate::CursorPosition(payload.cursor_position),
        )),
        _ => None,
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|m| m.id.as_str().to_string())
                .collect(),
            shape_count: room.shapes.len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Member> for MemberDetailDto {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.as_str().to_string(),
            display_name: member.display_name.clone(),
            cursor_color: member.cursor_color.clone(),
            current_tool: member.current_tool.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}

impl From<Room> for RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room.members.iter().map(MemberDetailDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            shapes: room.shapes,
        }
    }
}
