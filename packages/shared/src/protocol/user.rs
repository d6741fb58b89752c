//! User presence records exchanged over the wire.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Cursor color assigned when a client does not pick one
pub const DEFAULT_CURSOR_COLOR: &str = "#3b82f6";

/// Drawing tool currently selected by a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Cursor,
    Pen,
    Eraser,
    Rectangle,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::Pen => "pen",
            Tool::Eraser => "eraser",
            Tool::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tool name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool '{0}'")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cursor" => Ok(Tool::Cursor),
            "pen" => Ok(Tool::Pen),
            "eraser" => Ok(Tool::Eraser),
            "rectangle" => Ok(Tool::Rectangle),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

/// Cursor position in board coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A user as listed in `INITIAL_STATE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub current_room_id: String,
    pub current_tool: Tool,
    pub cursor_color: String,
    pub cursor_position: CursorPosition,
}
