//! Core domain models for the whiteboard rooms.

use chalkboard_shared::protocol::{CursorPosition, Shape, Tool};

use super::{
    connection::ConnectionHandle,
    value_object::{RoomId, Timestamp, UserId},
};

/// One user's live presence inside one room
#[derive(Debug, Clone)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
    pub cursor_color: String,
    pub current_tool: Tool,
    pub cursor_position: CursorPosition,
    pub joined_at: Timestamp,
    /// Live connection of this member
    pub connection: ConnectionHandle,
}

impl Member {
    pub fn new(
        id: UserId,
        display_name: String,
        cursor_color: String,
        current_tool: Tool,
        joined_at: Timestamp,
        connection: ConnectionHandle,
    ) -> Self {
        Self {
            id,
            display_name,
            cursor_color,
            current_tool,
            cursor_position: CursorPosition::default(),
            joined_at,
            connection,
        }
    }

    /// Apply a presence update to this member
    pub fn apply(&mut self, update: MemberUpdate) {
        match update {
            MemberUpdate::DisplayName(display_name) => self.display_name = display_name,
            MemberUpdate::CursorColor(cursor_color) => self.cursor_color = cursor_color,
            MemberUpdate::CursorPosition(position) => self.cursor_position = position,
        }
    }
}

/// Presence field update sent by a member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberUpdate {
    DisplayName(String),
    CursorColor(String),
    CursorPosition(CursorPosition),
}

/// Mutation of a room's shape collection
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeOperation {
    /// Insert, or overwrite a shape with the same id
    Add(Shape),
    /// Replace the shape with the same id, inserting it if absent
    Update(Shape),
    /// Delete the shape with this id if present
    Remove(String),
    /// Delete every shape
    Clear,
}

/// Represents a whiteboard room with its members and shapes.
///
/// Members and shapes are kept in insertion order. Replacing an entry keeps
/// its position, so snapshots list users in join order and shapes in draw
/// order.
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Members currently connected to the room
    pub members: Vec<Member>,
    /// Shapes drawn in the room; ids are unique
    pub shapes: Vec<Shape>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room with the given ID and creation timestamp
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: Vec::new(),
            shapes: Vec::new(),
            created_at,
        }
    }

    /// Insert a member, or overwrite the member with the same user id.
    ///
    /// Returns the previous member's connection when it belonged to a
    /// different connection than the new member.
    pub fn upsert_member(&mut self, member: Member) -> Option<ConnectionHandle> {
        match self.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => {
                let previous = std::mem::replace(existing, member);
                (previous.connection != existing.connection).then_some(previous.connection)
            }
            None => {
                self.members.push(member);
                None
            }
        }
    }

    /// Remove a member only if it is still bound to `connection`.
    ///
    /// Returns `true` if a member was removed.
    pub fn remove_member(&mut self, user_id: &UserId, connection: &ConnectionHandle) -> bool {
        let before = self.members.len();
        self.members
            .retain(|m| !(&m.id == user_id && &m.connection == connection));
        self.members.len() != before
    }

    /// Get a mutable member by user id, only if it is still bound to
    /// `connection`
    pub fn get_member_mut(
        &mut self,
        user_id: &UserId,
        connection: &ConnectionHandle,
    ) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| &m.id == user_id && &m.connection == connection)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Apply a shape operation, keeping shape ids unique
    pub fn apply_shape_operation(&mut self, operation: ShapeOperation) {
        match operation {
            ShapeOperation::Add(shape) | ShapeOperation::Update(shape) => self.upsert_shape(shape),
            ShapeOperation::Remove(shape_id) => self.shapes.retain(|s| s.id() != shape_id),
            ShapeOperation::Clear => self.shapes.clear(),
        }
    }

    fn upsert_shape(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.id() == shape.id()) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Snapshot of the current members and shapes
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            members: self.members.clone(),
            shapes: self.shapes.clone(),
        }
    }
}

/// Members and shapes of a room at one point in time
#[derive(Debug, Clone, Default)]
pub struct RoomSnapshot {
    pub members: Vec<Member>,
    pub shapes: Vec<Shape>,
}
