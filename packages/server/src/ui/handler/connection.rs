//! Per-connection state machine.
//!
//! ```text
//! Open{room} ──CONNECT──▶ Connected(session) ──close──▶ (dropped)
//!     │                                         ▲
//!     └──────────────────close──────────────────┘
//! ```
//!
//! An `Open` connection is subscribed to its path room and receives that
//! room's broadcasts, but everything except `CONNECT` is dropped.

use std::{future::Future, sync::Arc};

use chalkboard_shared::protocol::{MessageKind, SocketMessage, decode};
use futures_util::{Stream, StreamExt};

use crate::{
    domain::{ConnectionHandle, RoomId},
    ui::state::AppState,
    usecase::MemberSession,
};

/// Lifecycle phase of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Transport accepted, identity not yet known
    Open { room_id: RoomId },
    /// CONNECT processed
    Connected(MemberSession),
}

/// Mediates between one socket and the room registry
pub struct ConnectionHandler {
    state: Arc<AppState>,
    connection: ConnectionHandle,
    phase: ConnectionPhase,
}

impl ConnectionHandler {
    /// Subscribe the connection to `room_id` and enter the `Open` phase
    pub async fn open(state: Arc<AppState>, room_id: RoomId, connection: ConnectionHandle) -> Self {
        state
            .connect_member_usecase
            .open(&room_id, connection.clone())
            .await;
        Self {
            state,
            connection,
            phase: ConnectionPhase::Open { room_id },
        }
    }

    pub fn phase(&self) -> &ConnectionPhase {
        &self.phase
    }

    /// Handle one inbound text frame.
    ///
    /// Invalid or out-of-phase messages are dropped with a warning; the
    /// connection always stays open.
    pub async fn on_text(&mut self, text: &str) {
        let message = match decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    "Dropping invalid message on connection {}: {}",
                    self.connection.id(),
                    e
                );
                return;
            }
        };

        let kind = message.kind();
        match &self.phase {
            ConnectionPhase::Open { room_id } => {
                let SocketMessage::Connect(payload) = message else {
                    tracing::warn!(
                        "Dropping {} from unidentified connection {}",
                        kind,
                        self.connection.id()
                    );
                    return;
                };
                let room_id = room_id.clone();
                match self
                    .state
                    .connect_member_usecase
                    .execute(&room_id, &self.connection, payload)
                    .await
                {
                    Ok(session) => self.phase = ConnectionPhase::Connected(session),
                    Err(e) => tracing::warn!(
                        "Rejected CONNECT on connection {}: {}",
                        self.connection.id(),
                        e
                    ),
                }
            }
            ConnectionPhase::Connected(session) => {
                if kind == MessageKind::Connect {
                    tracing::warn!(
                        "Ignoring repeated CONNECT from '{}' on connection {}",
                        session.user_id,
                        self.connection.id()
                    );
                    return;
                }
                if let Err(e) = self
                    .state
                    .relay_message_usecase
                    .execute(session, message)
                    .await
                {
                    tracing::warn!("Dropping {} from '{}': {}", kind, session.user_id, e);
                }
            }
        }
    }

    /// Feed inbound frames to the state machine until the peer goes away or
    /// `writer_done` resolves, then close the connection.
    ///
    /// `writer_done` is only observed between frames: a frame being handled
    /// always runs to completion, so a CONNECT that joined the room is never
    /// cut off before the handler records its session.
    pub async fn run<S, W>(mut self, mut frames: S, writer_done: W)
    where
        S: Stream<Item = String> + Unpin,
        W: Future<Output = ()>,
    {
        tokio::pin!(writer_done);
        loop {
            let text = tokio::select! {
                frame = frames.next() => match frame {
                    Some(text) => text,
                    None => break,
                },
                () = &mut writer_done => {
                    tracing::debug!("Writer for connection {} finished", self.connection.id());
                    break;
                }
            };
            self.on_text(&text).await;
        }
        self.close().await;
    }

    /// Tear the connection down: unsubscribe, leave, notify.
    pub async fn close(self) {
        let (room_id, user_id) = match self.phase {
            ConnectionPhase::Open { room_id } => (room_id, None),
            ConnectionPhase::Connected(session) => (session.room_id, Some(session.user_id)),
        };
        self.state
            .disconnect_member_usecase
            .execute(&room_id, &self.connection, user_id.as_ref())
            .await;
        tracing::info!("Connection {} closed", self.connection.id());
    }
}
