//! HTTP API response DTOs for the whiteboard server.

use chalkboard_shared::protocol::Shape;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
    pub shape_count: usize,
    pub created_at: String, // RFC 3339
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub shapes: Vec<Shape>,
    pub created_at: String, // RFC 3339
}

/// Member detail for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub id: String,
    pub display_name: String,
    pub cursor_color: String,
    pub current_tool: String,
    pub joined_at: String, // RFC 3339
}
