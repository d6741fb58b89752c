//! MessagePusher trait 定義
//!
//! ルームに購読している接続へのメッセージ配信（Broadcast Fanout）の
//! インターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{ConnectionHandle, ConnectionId, MessagePushError, RoomId};

/// Broadcast Fanout
///
/// Subscriptions are per room and independent of membership: a connection
/// receives room traffic from the moment it subscribes, even before it joins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Subscribe a connection to a room's broadcasts
    async fn subscribe(&self, room_id: &RoomId, connection: ConnectionHandle);

    /// Remove a connection's subscription to a room
    async fn unsubscribe(&self, room_id: &RoomId, connection_id: &ConnectionId);

    /// Deliver a message to a single connection
    async fn push_to(
        &self,
        connection: &ConnectionHandle,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Deliver a message to every subscriber of a room except `exclude`.
    ///
    /// Best effort: a failed send is logged and skipped. Returns the number
    /// of subscribers the message was queued for.
    async fn publish(
        &self,
        room_id: &RoomId,
        content: &str,
        exclude: Option<ConnectionId>,
    ) -> usize;
}
