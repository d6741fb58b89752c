//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `HashMap<RoomId, Room>` をインメモリ DB として使用します。
//! ルームはプロセスの寿命の間だけ存在し、最後のメンバーが抜けた時点で
//! 図形ごと破棄されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chalkboard_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    CloseReason, ConnectionHandle, Member, MemberUpdate, RepositoryError, Room, RoomId,
    RoomRepository, RoomSnapshot, ShapeOperation, Timestamp, UserId,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// Room ID をキーとするルームのマップ
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// ルーム作成時刻の取得に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, room_id: &RoomId, member: Member) -> bool {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", room_id);
            Room::new(room_id.clone(), Timestamp::new(self.clock.now_millis()))
        });

        let user_id = member.id.clone();
        match room.upsert_member(member) {
            Some(previous) => {
                tracing::info!(
                    "Removing duplicate connection {} for user '{}' in room '{}'",
                    previous.id(),
                    user_id,
                    room_id
                );
                previous.close(CloseReason::Replaced);
                true
            }
            None => false,
        }
    }

    async fn leave(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        connection: &ConnectionHandle,
    ) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };

        let removed = room.remove_member(user_id, connection);
        if removed && room.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room '{}' is empty and has been removed", room_id);
        }
        removed
    }

    async fn snapshot(&self, room_id: &RoomId) -> RoomSnapshot {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Room::snapshot)
            .unwrap_or_default()
    }

    async fn apply_shape_operation(
        &self,
        room_id: &RoomId,
        operation: ShapeOperation,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        room.apply_shape_operation(operation);
        Ok(())
    }

    async fn update_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        connection: &ConnectionHandle,
        update: MemberUpdate,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        if !room.members.iter().any(|m| &m.id == user_id) {
            return Err(RepositoryError::MemberNotFound(user_id.to_string()));
        }
        let member = room
            .get_member_mut(user_id, connection)
            .ok_or_else(|| RepositoryError::StaleConnection(user_id.to_string()))?;
        member.apply(update);
        Ok(())
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut rooms: Vec<Room> = rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        rooms
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }
}
