//! UseCase: ルーム詳細の取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームが存在しなければ `None`
    pub async fn execute(&self, room_id: &RoomId) -> Option<Room> {
        self.repository.get_room(room_id).await
    }
}
