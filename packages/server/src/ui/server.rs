//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::RoomId,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        RelayMessageUseCase,
    },
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler, websocket_room_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket whiteboard server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_member_usecase,
///     disconnect_member_usecase,
///     relay_message_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
///     RoomId::new("lobby".to_string())?,
/// );
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_member_usecase` - UseCase for CONNECT handling
    /// * `disconnect_member_usecase` - UseCase for connection teardown
    /// * `relay_message_usecase` - UseCase for relaying shape and presence messages
    /// * `get_rooms_usecase` - UseCase for getting rooms list
    /// * `get_room_detail_usecase` - UseCase for getting room detail
    /// * `default_room` - Room used when neither path nor query names one
    pub fn new(
        connect_member_usecase: Arc<ConnectMemberUseCase>,
        disconnect_member_usecase: Arc<DisconnectMemberUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        default_room: RoomId,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_member_usecase,
                disconnect_member_usecase,
                relay_message_usecase,
                get_rooms_usecase,
                get_room_detail_usecase,
                default_room,
            }),
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            .route("/ws/{room_id}", get(websocket_room_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the WebSocket whiteboard server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket whiteboard server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/{}", bind_addr, self.state.default_room);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
