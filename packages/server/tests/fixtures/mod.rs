//! Shared helpers for integration tests.
//!
//! The server runs in-process on an ephemeral port; clients talk to it with
//! `tokio-tungstenite` (WebSocket) and `reqwest` (HTTP).

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chalkboard_server::{
    domain::RoomId,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, EventSequencer, GetRoomDetailUseCase,
        GetRoomsUseCase, RelayMessageUseCase,
    },
};
use chalkboard_shared::{
    protocol::{SocketMessage, decode, encode},
    time::SystemClock,
};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// In-process server bound to 127.0.0.1 on a random port
pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let clock = Arc::new(SystemClock);
        let repository = Arc::new(InMemoryRoomRepository::new(clock.clone()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let sequencer = Arc::new(EventSequencer::new());
        let server = Server::new(
            Arc::new(ConnectMemberUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
                clock,
            )),
            Arc::new(DisconnectMemberUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            Arc::new(RelayMessageUseCase::new(
                repository.clone(),
                message_pusher,
                sequencer,
            )),
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository)),
            RoomId::new("lobby".to_string()).unwrap(),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            server
                .serve(listener, std::future::pending())
                .await
                .expect("Server error");
        });

        TestServer { addr, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A raw WebSocket client speaking the wire protocol
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer, path: &str) -> Self {
        let (stream, _response) = connect_async(server.ws_url(path))
            .await
            .expect("Failed to connect");
        TestClient { stream }
    }

    /// Open a socket on `/ws/{room}` and send CONNECT for `id`
    pub async fn join(server: &TestServer, room: &str, id: &str, name: &str) -> Self {
        let mut client = Self::connect(server, &format!("/ws/{}", room)).await;
        client.send_raw(&connect_json(Some(id), name, room)).await;
        client
    }

    pub async fn send(&mut self, message: &SocketMessage) {
        self.send_raw(&encode(message).unwrap()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send");
    }

    /// Next protocol message; panics on timeout or close
    pub async fn recv(&mut self) -> SocketMessage {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a message")
                .expect("Stream ended")
                .expect("WebSocket error");
            match frame {
                Message::Text(text) => return decode(text.as_str()).expect("Invalid message"),
                Message::Close(frame) => panic!("Connection closed: {:?}", frame),
                _ => continue,
            }
        }
    }

    /// Wait for the server to close the connection and return its close frame
    pub async fn recv_close(&mut self) -> Option<CloseFrame> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for close");
            match frame {
                Some(Ok(Message::Close(frame))) => return frame,
                Some(Ok(_)) => continue,
                Some(Err(_)) | None => return None,
            }
        }
    }

    /// Assert that nothing arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(frame))) = tokio::time::timeout(wait, self.stream.next()).await {
            panic!("Expected no message, got {:?}", frame);
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

pub fn connect_json(id: Option<&str>, name: &str, room: &str) -> String {
    let id = id.map(|id| format!(r#""id":"{}","#, id)).unwrap_or_default();
    format!(
        r##"{{"type":"CONNECT","payload":{{{}"displayName":"{}","roomId":"{}","cursorColor":"#3b82f6","currentTool":"pen"}}}}"##,
        id, name, room
    )
}
