//! Client application state: the local user, the board replica and the
//! connection, glued together by the CLI commands.

use chalkboard_shared::protocol::{ConnectPayload, SocketMessage, Tool, decode};

use crate::{
    board::Board,
    command::Command,
    connection::{ClientConnection, ConnectionStatus},
    formatter::MessageFormatter,
    runner::ClientConfig,
};

pub struct ClientApp {
    user_id: String,
    display_name: String,
    room: String,
    cursor_color: String,
    board: Board,
    connection: ClientConnection,
}

impl ClientApp {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            user_id: config.user_id.clone(),
            display_name: config.display_name.clone(),
            room: config.room.clone(),
            cursor_color: config.cursor_color.clone(),
            board: Board::new(config.user_id.clone(), config.room.clone()),
            connection: ClientConnection::new(),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn connection(&self) -> &ClientConnection {
        &self.connection
    }

    /// The CONNECT frame announcing this user; sent first on every socket.
    pub fn connect_message(&self) -> SocketMessage {
        SocketMessage::Connect(ConnectPayload {
            id: Some(self.user_id.clone()),
            display_name: self.display_name.clone(),
            room_id: self.room.clone(),
            cursor_color: self.cursor_color.clone(),
            current_tool: Tool::Cursor.as_str().to_string(),
        })
    }

    /// Run one line typed by the user and return what to print.
    ///
    /// Edits are applied to the local board first, then shared when connected.
    pub fn handle_line(&mut self, line: &str) -> String {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => return MessageFormatter::format_error(&e),
        };

        match &command {
            Command::Shapes => return MessageFormatter::format_shapes(self.board.shapes()),
            Command::Users => {
                return MessageFormatter::format_users(self.board.users(), &self.user_id);
            }
            Command::Help => return MessageFormatter::format_help(),
            _ => {}
        }

        let message = match command.to_message(&self.board, &self.cursor_color) {
            Ok(Some(message)) => message,
            Ok(None) => return String::new(),
            Err(e) => return MessageFormatter::format_error(&e),
        };

        // 再接続時の CONNECT にも反映する
        match command {
            Command::Name(display_name) => self.display_name = display_name,
            Command::Color(cursor_color) => self.cursor_color = cursor_color,
            _ => {}
        }

        let event = self.board.apply(&message);
        let shared = self.connection.send_update(&message);

        let mut output = MessageFormatter::format_event(&event).unwrap_or_default();
        if !shared && self.connection.status() != ConnectionStatus::Connected {
            output.push_str("(kept local)\n");
        }
        output
    }

    /// Apply one text frame from the server and return what to print.
    pub fn handle_incoming(&mut self, text: &str) -> Option<String> {
        let message = match decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Dropping invalid message from server: {}", e);
                return None;
            }
        };
        tracing::debug!("Received {}", message.kind());

        let event = self.board.apply(&message);

        let mut output = String::new();
        if matches!(message, SocketMessage::InitialState(_)) {
            self.connection.mark_connected();
            output.push_str(&MessageFormatter::format_status(
                ConnectionStatus::Connected,
                &self.room,
            ));
        }
        if let Some(line) = MessageFormatter::format_event(&event) {
            output.push_str(&line);
        }

        (!output.is_empty()).then_some(output)
    }
}
