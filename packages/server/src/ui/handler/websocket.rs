//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::SinkExt,
    stream::{SplitSink, SplitStream, Stream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionHandle, ConnectionIdFactory, OutboundFrame, RoomId},
    ui::state::AppState,
};

use super::connection::ConnectionHandler;

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub room_id: Option<String>,
}

/// `GET /ws`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let room_id = resolve_room_id(None, query.room_id.as_deref(), &state.default_room);
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id))
}

/// `GET /ws/{room_id}`
pub async fn websocket_room_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(path_room): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let room_id = resolve_room_id(
        Some(path_room.as_str()),
        query.room_id.as_deref(),
        &state.default_room,
    );
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id))
}

/// Pick the room a new connection subscribes to: path segment, then the
/// `roomId` query parameter, then the default room.
fn resolve_room_id(path: Option<&str>, query: Option<&str>, default_room: &RoomId) -> RoomId {
    [path, query]
        .into_iter()
        .flatten()
        .find_map(|candidate| RoomId::new(candidate.to_string()).ok())
        .unwrap_or_else(|| default_room.clone())
}

/// Spawns a task that drains this connection's outbound queue into the WebSocket sink.
///
/// A `Close` frame is the last thing written; the task ends right after it.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close { code, reason } => {
                    let close = Message::Close(Some(CloseFrame {
                        code,
                        reason: reason.into(),
                    }));
                    if let Err(e) = sender.send(close).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

/// Inbound frames as text, ending when the peer closes or errors.
///
/// Binary frames are accepted when they hold UTF-8.
fn inbound_text(receiver: SplitStream<WebSocket>) -> impl Stream<Item = String> + Unpin {
    receiver
        .take_while(|msg| {
            let open = match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("Client requested close");
                    false
                }
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    false
                }
                Ok(_) => true,
            };
            future::ready(open)
        })
        .filter_map(|msg| {
            let text = match msg {
                Ok(Message::Text(text)) => Some(text.as_str().to_owned()),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => Some(text),
                    Err(_) => {
                        tracing::warn!("Dropping non UTF-8 binary frame");
                        None
                    }
                },
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => None,
            };
            future::ready(text)
        })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = ConnectionHandle::new(ConnectionIdFactory::generate(), tx);
    tracing::info!(
        "Connection {} opened (room '{}')",
        connection.id(),
        room_id
    );

    let handler = ConnectionHandler::open(state, room_id, connection).await;
    let mut send_task = pusher_loop(rx, sender);

    // If either side finishes, the connection is over
    let writer_done = async {
        let _ = (&mut send_task).await;
    };
    handler.run(inbound_text(receiver), writer_done).await;
    send_task.abort();
}
