//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ルームごとの購読者（接続）の管理
//! - 特定の接続への送信（push_to）と、ルーム単位の配信（publish）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `ConnectionHandle` を受け取り、送信キューへの
//! enqueue だけを行います。ソケットへの書き込みは接続ごとの送信タスクが担当
//! するため、遅い受信者が他の受信者やルーム状態をブロックすることはありません。
//!
//! 購読はメンバーシップとは独立しています。CONNECT 前の接続もパスで指定された
//! ルームの配信を受け取ります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionHandle, ConnectionId, MessagePushError, MessagePusher, RoomId};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// ルームごとの購読者
    ///
    /// Key: RoomId
    /// Value: ConnectionId -> ConnectionHandle
    subscribers: Mutex<HashMap<RoomId, HashMap<ConnectionId, ConnectionHandle>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// 指定ルームの購読者数
    pub async fn subscriber_count(&self, room_id: &RoomId) -> usize {
        let subscribers = self.subscribers.lock().await;
        subscribers.get(room_id).map_or(0, HashMap::len)
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn subscribe(&self, room_id: &RoomId, connection: ConnectionHandle) {
        let mut subscribers = self.subscribers.lock().await;
        let connection_id = connection.id();
        subscribers
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id, connection);
        tracing::debug!(
            "Connection {} subscribed to room '{}'",
            connection_id,
            room_id
        );
    }

    async fn unsubscribe(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(room) = subscribers.get_mut(room_id) {
            room.remove(connection_id);
            if room.is_empty() {
                subscribers.remove(room_id);
            }
        }
        tracing::debug!(
            "Connection {} unsubscribed from room '{}'",
            connection_id,
            room_id
        );
    }

    async fn push_to(
        &self,
        connection: &ConnectionHandle,
        content: &str,
    ) -> Result<(), MessagePushError> {
        connection.send_text(content)?;
        tracing::debug!("Pushed message to connection {}", connection.id());
        Ok(())
    }

    async fn publish(
        &self,
        room_id: &RoomId,
        content: &str,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let subscribers = self.subscribers.lock().await;
        let Some(room) = subscribers.get(room_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (connection_id, connection) in room {
            if Some(*connection_id) == exclude {
                continue;
            }
            // 配信は best-effort。閉じた接続はスキップして残りに配信を続ける
            match connection.send_text(content) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to publish to connection {} in room '{}': {}",
                        connection_id,
                        room_id,
                        e
                    );
                }
            }
        }
        tracing::debug!(
            "Published message to {} connection(s) in room '{}'",
            delivered,
            room_id
        );
        delivered
    }
}
