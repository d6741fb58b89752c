//! Text rendering of board events for the terminal.

use chalkboard_shared::protocol::{Shape, User};

use crate::{board::BoardEvent, command::HELP, connection::ConnectionStatus};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a board event, or `None` for events not worth printing
    /// (cursor movement is far too chatty for a terminal).
    pub fn format_event(event: &BoardEvent) -> Option<String> {
        let line = match event {
            BoardEvent::Synced { shapes, users } => {
                format!("Synced with room: {} shape(s), {} user(s)", shapes, users)
            }
            BoardEvent::ShapeAdded(id) => format!("+ shape {}", id),
            BoardEvent::ShapeUpdated(id) => format!("~ shape {}", id),
            BoardEvent::ShapeRemoved(id) => format!("- shape {}", id),
            BoardEvent::Cleared => "Canvas cleared".to_string(),
            BoardEvent::UserJoined { id, display_name } => {
                format!("+ {} ({}) joined", display_name, id)
            }
            BoardEvent::UserLeft { id, display_name } => match display_name {
                Some(name) => format!("- {} ({}) left", name, id),
                None => format!("- {} left", id),
            },
            BoardEvent::UserRenamed { id, display_name } => {
                format!("{} is now known as {}", id, display_name)
            }
            BoardEvent::UserRecolored { id, cursor_color } => {
                format!("{} changed cursor color to {}", id, cursor_color)
            }
            BoardEvent::CursorMoved { .. } | BoardEvent::Ignored => return None,
        };
        Some(format!("\n{}\n", line))
    }

    /// Format the shape list
    pub fn format_shapes(shapes: &[Shape]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Shapes:\n");

        if shapes.is_empty() {
            output.push_str("(No shapes)\n");
        } else {
            for shape in shapes {
                let (x, y) = shape.position();
                output.push_str(&format!(
                    "{} {} at ({}, {})\n",
                    shape.kind().as_str(),
                    shape.id(),
                    x,
                    y
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the user list, marking the current user as "(me)"
    pub fn format_users(users: &[User], current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Users:\n");

        if users.is_empty() {
            output.push_str("(No users)\n");
        } else {
            for user in users {
                let me_suffix = if user.id == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!(
                    "{}{} [{}] color {} tool {}\n",
                    user.display_name,
                    me_suffix,
                    user.id,
                    user.cursor_color,
                    user.current_tool.as_str()
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    pub fn format_help() -> String {
        format!("\n{}\n", HELP)
    }

    /// Format a connectivity change
    pub fn format_status(status: ConnectionStatus, room: &str) -> String {
        match status {
            ConnectionStatus::Connecting => format!("\nConnecting to room '{}'...\n", room),
            ConnectionStatus::Connected => format!("\nConnected to room '{}'\n", room),
            ConnectionStatus::Local => {
                "\nOffline: edits stay local until the connection is back\n".to_string()
            }
        }
    }

    /// Format a local error such as a bad command
    pub fn format_error(error: &dyn std::fmt::Display) -> String {
        format!("\n! {}\n", error)
    }
}
