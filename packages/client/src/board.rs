//! Client-side replica of a room.
//!
//! `INITIAL_STATE` replaces everything; every other message patches the
//! replica in place. The same reducer is used for messages received from the
//! server and for the local user's own edits.

use chalkboard_shared::protocol::{CursorPosition, Shape, SocketMessage, Tool, User};

/// What a message changed, for display
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Synced { shapes: usize, users: usize },
    ShapeAdded(String),
    ShapeUpdated(String),
    ShapeRemoved(String),
    Cleared,
    UserJoined { id: String, display_name: String },
    UserLeft { id: String, display_name: Option<String> },
    UserRenamed { id: String, display_name: String },
    UserRecolored { id: String, cursor_color: String },
    CursorMoved { id: String, position: CursorPosition },
    Ignored,
}

/// Local replica of the shapes and users of one room
#[derive(Debug, Clone)]
pub struct Board {
    local_user_id: String,
    room_id: String,
    shapes: Vec<Shape>,
    users: Vec<User>,
}

impl Board {
    pub fn new(local_user_id: String, room_id: String) -> Self {
        Self {
            local_user_id,
            room_id,
            shapes: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn local_user_id(&self) -> &str {
        &self.local_user_id
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Apply one message to the replica
    pub fn apply(&mut self, message: &SocketMessage) -> BoardEvent {
        match message {
            SocketMessage::InitialState(state) => {
                self.shapes = state.shapes.clone();
                self.users = state.users.clone();
                BoardEvent::Synced {
                    shapes: self.shapes.len(),
                    users: self.users.len(),
                }
            }
            SocketMessage::AddShape(shape) => {
                self.upsert_shape(shape.clone());
                BoardEvent::ShapeAdded(shape.id().to_string())
            }
            SocketMessage::UpdateShape(shape) => {
                self.upsert_shape(shape.clone());
                BoardEvent::ShapeUpdated(shape.id().to_string())
            }
            SocketMessage::RemoveShape(shape) => {
                self.shapes.retain(|s| s.id() != shape.id());
                BoardEvent::ShapeRemoved(shape.id().to_string())
            }
            SocketMessage::ClearCanvas => {
                self.shapes.clear();
                BoardEvent::Cleared
            }
            SocketMessage::UserJoined(joined) => {
                // 自分の参加通知は INITIAL_STATE で反映済み
                if joined.id == self.local_user_id {
                    return BoardEvent::Ignored;
                }
                let user = User {
                    id: joined.id.clone(),
                    display_name: joined.display_name.clone(),
                    current_room_id: self.room_id.clone(),
                    current_tool: joined.current_tool.parse().unwrap_or(Tool::Cursor),
                    cursor_color: joined.cursor_color.clone(),
                    cursor_position: CursorPosition::default(),
                };
                match self.users.iter_mut().find(|u| u.id == user.id) {
                    Some(existing) => *existing = user,
                    None => self.users.push(user),
                }
                BoardEvent::UserJoined {
                    id: joined.id.clone(),
                    display_name: joined.display_name.clone(),
                }
            }
            SocketMessage::UserLeft(left) => {
                let display_name = self.user(&left.id).map(|u| u.display_name.clone());
                self.users.retain(|u| u.id != left.id);
                BoardEvent::UserLeft {
                    id: left.id.clone(),
                    display_name,
                }
            }
            SocketMessage::UpdateDisplayName(update) => {
                if let Some(user) = self.user_mut(&update.id) {
                    user.display_name = update.display_name.clone();
                }
                BoardEvent::UserRenamed {
                    id: update.id.clone(),
                    display_name: update.display_name.clone(),
                }
            }
            SocketMessage::UpdateCursorColor(update) => {
                if let Some(user) = self.user_mut(&update.id) {
                    user.cursor_color = update.cursor_color.clone();
                }
                BoardEvent::UserRecolored {
                    id: update.id.clone(),
                    cursor_color: update.cursor_color.clone(),
                }
            }
            SocketMessage::UpdateCursorPosition(update) => {
                if let Some(user) = self.user_mut(&update.id) {
                    user.cursor_position = update.cursor_position;
                }
                BoardEvent::CursorMoved {
                    id: update.id.clone(),
                    position: update.cursor_position,
                }
            }
            SocketMessage::Connect(_) => {
                tracing::warn!("Ignoring CONNECT received from the server");
                BoardEvent::Ignored
            }
            SocketMessage::DrawUpdate(_) => BoardEvent::Ignored,
        }
    }

    fn upsert_shape(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.id() == shape.id()) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }
}
