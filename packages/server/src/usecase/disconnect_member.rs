//! UseCase: メンバー切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectMemberUseCase::execute() メソッド
//! - 購読解除、Room からの退出、USER_LEFT の配信
//!
//! ### なぜこのテストが必要か
//! - 最後のメンバーが抜けたルームは図形ごと破棄される
//! - 置き換え済みの古い接続の切断で USER_LEFT を流してはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの切断と通知
//! - エッジケース：CONNECT 前の接続の切断、置き換え済み接続の切断

use std::sync::Arc;

use chalkboard_shared::protocol::{SocketMessage, UserLeftPayload, encode};

use crate::domain::{ConnectionHandle, MessagePusher, RoomId, RoomRepository, UserId};

use super::sequencer::EventSequencer;

/// メンバー切断のユースケース
pub struct DisconnectMemberUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<EventSequencer>,
}

impl DisconnectMemberUseCase {
    /// 新しい DisconnectMemberUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<EventSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// 切断を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 接続が購読しているルーム
    /// * `connection` - 切断された接続のハンドル
    /// * `user_id` - CONNECT 済みであればそのユーザー ID
    ///
    /// # Returns
    ///
    /// メンバーが実際に削除された（USER_LEFT を配信した）かどうか
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection: &ConnectionHandle,
        user_id: Option<&UserId>,
    ) -> bool {
        let _guard = self.sequencer.enter().await;

        // 1. 配信の購読を解除
        self.message_pusher
            .unsubscribe(room_id, &connection.id())
            .await;

        let Some(user_id) = user_id else {
            tracing::debug!("Connection {} closed before CONNECT", connection.id());
            return false;
        };

        // 2. Room から退出（置き換え済みの接続なら何もしない）
        if !self.repository.leave(room_id, user_id, connection).await {
            tracing::debug!(
                "Stale close for user '{}' on connection {}, ignoring",
                user_id,
                connection.id()
            );
            return false;
        }
        tracing::info!("User '{}' left room '{}'", user_id, room_id);

        // 3. 残りのメンバーに USER_LEFT を配信
        let left = SocketMessage::UserLeft(UserLeftPayload {
            id: user_id.as_str().to_string(),
        });
        match encode(&left) {
            Ok(json) => {
                self.message_pusher.publish(room_id, &json, None).await;
            }
            Err(e) => tracing::error!("Failed to encode USER_LEFT: {}", e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, Member, MockMessagePusher, OutboundFrame, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use chalkboard_shared::{
        protocol::{Tool, decode},
        time::FixedClock,
    };
    use tokio::sync::mpsc;

    fn create_test_repository() -> Arc<InMemoryRoomRepository> {
        Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(1000))))
    }

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string()).unwrap()
    }

    fn connection() -> (ConnectionHandle, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(ConnectionIdFactory::generate(), tx), rx)
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    async fn join(
        repository: &InMemoryRoomRepository,
        pusher: &WebSocketMessagePusher,
        id: &str,
        connection: &ConnectionHandle,
    ) {
        pusher.subscribe(&lobby(), connection.clone()).await;
        repository
            .join(
                &lobby(),
                Member::new(
                    user(id),
                    id.to_string(),
                    "#3b82f6".to_string(),
                    Tool::Cursor,
                    Timestamp::new(1000),
                    connection.clone(),
                ),
            )
            .await;
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // テスト項目: 切断すると残りのメンバーに USER_LEFT が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectMemberUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(EventSequencer::new()),
        );
        let (alice, mut alice_rx) = connection();
        let (bob, mut bob_rx) = connection();
        join(&repository, &pusher, "u1", &alice).await;
        join(&repository, &pusher, "u2", &bob).await;

        // when (操作):
        let removed = usecase.execute(&lobby(), &bob, Some(&user("u2"))).await;

        // then (期待する結果):
        assert!(removed);
        match alice_rx.try_recv() {
            Ok(OutboundFrame::Text(text)) => assert_eq!(
                decode(&text).unwrap(),
                SocketMessage::UserLeft(UserLeftPayload {
                    id: "u2".to_string()
                })
            ),
            other => panic!("unexpected frame: {:?}", other),
        }
        assert!(bob_rx.try_recv().is_err());
        assert_eq!(repository.snapshot(&lobby()).await.members.len(), 1);
    }

    #[tokio::test]
    async fn test_last_member_disconnect_removes_room() {
        // テスト項目: 最後のメンバーが切断するとルームが削除される
        let repository = create_test_repository();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectMemberUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(EventSequencer::new()),
        );
        let (alice, _alice_rx) = connection();
        join(&repository, &pusher, "u1", &alice).await;

        let removed = usecase.execute(&lobby(), &alice, Some(&user("u1"))).await;

        assert!(removed);
        assert!(repository.get_room(&lobby()).await.is_none());
        assert_eq!(pusher.subscriber_count(&lobby()).await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_before_connect_only_unsubscribes() {
        // テスト項目: CONNECT 前の切断は購読解除のみで USER_LEFT を配信しない
        // given (前提条件):
        let repository = create_test_repository();
        let (conn, _rx) = connection();
        let conn_id = conn.id();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_unsubscribe()
            .withf(move |room_id, connection_id| {
                room_id.as_str() == "lobby" && *connection_id == conn_id
            })
            .times(1)
            .returning(|_, _| ());
        pusher.expect_publish().never();
        let usecase =
            DisconnectMemberUseCase::new(repository, Arc::new(pusher), Arc::new(EventSequencer::new()));

        // when (操作):
        let removed = usecase.execute(&lobby(), &conn, None).await;

        // then (期待する結果):
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_stale_disconnect_after_supersede_sends_no_user_left() {
        // テスト項目: 置き換え済みの古い接続が切断されても USER_LEFT は配信されない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectMemberUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(EventSequencer::new()),
        );
        let (watcher, mut watcher_rx) = connection();
        let (old_conn, _old_rx) = connection();
        let (new_conn, _new_rx) = connection();
        join(&repository, &pusher, "u0", &watcher).await;
        join(&repository, &pusher, "u1", &old_conn).await;
        join(&repository, &pusher, "u1", &new_conn).await;

        // when (操作):
        let removed = usecase.execute(&lobby(), &old_conn, Some(&user("u1"))).await;

        // then (期待する結果):
        assert!(!removed);
        assert!(watcher_rx.try_recv().is_err());
        assert_eq!(repository.snapshot(&lobby()).await.members.len(), 2);
    }
}
