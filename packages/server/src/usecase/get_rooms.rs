//! UseCase: ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する全てのルームを room id 順で返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionHandle, ConnectionIdFactory, Member, RoomId, Timestamp, UserId},
        infrastructure::repository::InMemoryRoomRepository,
    };
    use chalkboard_shared::{protocol::Tool, time::FixedClock};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_get_rooms() {
        // テスト項目: 参加者のいるルームだけが一覧に含まれる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(0))));
        let usecase = GetRoomsUseCase::new(repository.clone());
        assert!(usecase.execute().await.is_empty());

        for room in ["zeta", "alpha"] {
            let (tx, _rx) = mpsc::unbounded_channel();
            repository
                .join(
                    &RoomId::new(room.to_string()).unwrap(),
                    Member::new(
                        UserId::new("u1".to_string()).unwrap(),
                        "Alice".to_string(),
                        "#3b82f6".to_string(),
                        Tool::Cursor,
                        Timestamp::new(0),
                        ConnectionHandle::new(ConnectionIdFactory::generate(), tx),
                    ),
                )
                .await;
        }

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
