//! UseCase: 接続済みメンバーからのメッセージ中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 図形操作・プレゼンス更新の Room への反映と、送信者以外への配信
//!
//! ### なぜこのテストが必要か
//! - 送信者に自分のメッセージが戻ってきてはいけない
//! - サーバー発のメッセージ種別をクライアントから受け付けてはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ADD_SHAPE / UPDATE_SHAPE / REMOVE_SHAPE / CLEAR_CANVAS / UPDATE_*
//! - エッジケース：存在しない図形の REMOVE、DRAW_UPDATE
//! - 異常系：他人の id での UPDATE_*、USER_JOINED などサーバー発の種別

use std::sync::Arc;

use chalkboard_shared::protocol::{MessageKind, SocketMessage, encode};

use crate::{
    domain::{MessagePusher, RoomRepository},
    infrastructure::dto::conversion::{member_update, shape_operation},
};

use super::{connect_member::MemberSession, error::RelayError, sequencer::EventSequencer};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<EventSequencer>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
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

    /// メッセージを Room に反映し、送信者以外のメンバーに配信する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信した接続数（DRAW_UPDATE は常に 0）
    /// * `Err(RelayError)` - メッセージを破棄すべき場合
    pub async fn execute(
        &self,
        session: &MemberSession,
        message: SocketMessage,
    ) -> Result<usize, RelayError> {
        let kind = message.kind();
        if kind == MessageKind::Connect || !kind.is_client_originated() {
            return Err(RelayError::NotRelayable(kind));
        }
        if kind == MessageKind::DrawUpdate {
            tracing::debug!("Ignoring {} from '{}'", kind, session.user_id);
            return Ok(0);
        }

        let _guard = self.sequencer.enter().await;

        // 1. Room の状態を更新
        if let Some(operation) = shape_operation(&message) {
            self.repository
                .apply_shape_operation(&session.room_id, operation)
                .await?;
        } else if let Some((payload_id, update)) = member_update(&message) {
            if payload_id != session.user_id.as_str() {
                return Err(RelayError::IdentityMismatch {
                    payload_id: payload_id.to_string(),
                    sender_id: session.user_id.to_string(),
                });
            }
            self.repository
                .update_member(
                    &session.room_id,
                    &session.user_id,
                    &session.connection,
                    update,
                )
                .await?;
        }

        // 2. 検証済みのメッセージを送信者以外に配信
        let json = encode(&message)?;
        let delivered = self
            .message_pusher
            .publish(&session.room_id, &json, Some(session.connection.id()))
            .await;
        tracing::debug!(
            "Relayed {} from '{}' to {} connection(s)",
            kind,
            session.user_id,
            delivered
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionHandle, ConnectionIdFactory, Member, MockMessagePusher, OutboundFrame,
            RepositoryError, RoomId, Timestamp, UserId,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use chalkboard_shared::{
        protocol::{
            CircleShape, CursorPosition, DEFAULT_COLOR, Shape, Tool, UpdateCursorPositionPayload,
            UpdateDisplayNamePayload, UserLeftPayload, decode,
        },
        time::FixedClock,
    };
    use tokio::sync::mpsc;

    struct Fixture {
        repository: Arc<InMemoryRoomRepository>,
        usecase: RelayMessageUseCase,
        alice: MemberSession,
        alice_rx: mpsc::UnboundedReceiver<OutboundFrame>,
        bob_rx: mpsc::UnboundedReceiver<OutboundFrame>,
    }

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string()).unwrap()
    }

    /// alice (u1) と bob (u2) が lobby に参加済みの状態を作る
    async fn setup() -> Fixture {
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(
            1000,
        ))));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let mut sessions = Vec::new();
        let mut receivers = Vec::new();
        for id in ["u1", "u2"] {
            let (tx, rx) = mpsc::unbounded_channel();
            let connection = ConnectionHandle::new(ConnectionIdFactory::generate(), tx);
            let user_id = UserId::new(id.to_string()).unwrap();
            pusher.subscribe(&lobby(), connection.clone()).await;
            repository
                .join(
                    &lobby(),
                    Member::new(
                        user_id.clone(),
                        id.to_string(),
                        "#3b82f6".to_string(),
                        Tool::Pen,
                        Timestamp::new(1000),
                        connection.clone(),
                    ),
                )
                .await;
            sessions.push(MemberSession {
                user_id,
                room_id: lobby(),
                connection,
            });
            receivers.push(rx);
        }
        let bob_rx = receivers.pop().unwrap();
        let alice_rx = receivers.pop().unwrap();
        let usecase = RelayMessageUseCase::new(
            repository.clone(),
            pusher,
            Arc::new(EventSequencer::new()),
        );
        Fixture {
            repository,
            usecase,
            alice: sessions.swap_remove(0),
            alice_rx,
            bob_rx,
        }
    }

    fn circle(id: &str, x: f64) -> Shape {
        Shape::Circle(CircleShape {
            id: id.to_string(),
            x,
            y: 5.0,
            stroke_color: DEFAULT_COLOR.to_string(),
            fill_color: DEFAULT_COLOR.to_string(),
            radius: 10.0,
        })
    }

    fn received(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> SocketMessage {
        match rx.try_recv() {
            Ok(OutboundFrame::Text(text)) => decode(&text).unwrap(),
            other => panic!("expected a text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_shape_is_stored_and_relayed_to_others_only() {
        // テスト項目: ADD_SHAPE は保存され、送信者以外に同じ内容で届く
        // given (前提条件):
        let mut f = setup().await;
        let message = SocketMessage::AddShape(circle("s1", 5.0));

        // when (操作):
        let delivered = f.usecase.execute(&f.alice, message.clone()).await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(received(&mut f.bob_rx), message);
        assert!(f.alice_rx.try_recv().is_err());
        assert_eq!(f.repository.snapshot(&lobby()).await.shapes.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_shape_behaves_like_add() {
        // テスト項目: 存在しない id の UPDATE_SHAPE は追加として扱われる
        let f = setup().await;

        f.usecase
            .execute(&f.alice, SocketMessage::UpdateShape(circle("s9", 1.0)))
            .await
            .unwrap();

        let shapes = f.repository.snapshot(&lobby()).await.shapes;
        assert_eq!(shapes, vec![circle("s9", 1.0)]);
    }

    #[tokio::test]
    async fn test_update_replaces_existing_shape() {
        // テスト項目: UPDATE_SHAPE は同じ id の図形を置き換える
        let f = setup().await;
        f.usecase
            .execute(&f.alice, SocketMessage::AddShape(circle("s1", 5.0)))
            .await
            .unwrap();

        f.usecase
            .execute(&f.alice, SocketMessage::UpdateShape(circle("s1", 50.0)))
            .await
            .unwrap();

        let shapes = f.repository.snapshot(&lobby()).await.shapes;
        assert_eq!(shapes, vec![circle("s1", 50.0)]);
    }

    #[tokio::test]
    async fn test_remove_unknown_shape_is_noop_but_relayed() {
        // テスト項目: 存在しない図形の REMOVE_SHAPE はエラーにならず、そのまま配信される
        let mut f = setup().await;

        let result = f
            .usecase
            .execute(&f.alice, SocketMessage::RemoveShape(circle("ghost", 0.0)))
            .await;

        assert_eq!(result.unwrap(), 1);
        assert!(matches!(received(&mut f.bob_rx), SocketMessage::RemoveShape(_)));
    }

    #[tokio::test]
    async fn test_clear_canvas_empties_shapes() {
        // テスト項目: CLEAR_CANVAS で図形が全て消える
        let mut f = setup().await;
        f.usecase
            .execute(&f.alice, SocketMessage::AddShape(circle("s1", 5.0)))
            .await
            .unwrap();
        let _ = received(&mut f.bob_rx);

        f.usecase
            .execute(&f.alice, SocketMessage::ClearCanvas)
            .await
            .unwrap();

        assert!(f.repository.snapshot(&lobby()).await.shapes.is_empty());
        assert_eq!(received(&mut f.bob_rx), SocketMessage::ClearCanvas);
    }

    #[tokio::test]
    async fn test_presence_update_is_mirrored_into_registry() {
        // テスト項目: 表示名とカーソル位置の更新が Room のメンバー情報に反映される
        // given (前提条件):
        let mut f = setup().await;

        // when (操作):
        f.usecase
            .execute(
                &f.alice,
                SocketMessage::UpdateDisplayName(UpdateDisplayNamePayload {
                    id: "u1".to_string(),
                    display_name: "Alice".to_string(),
                }),
            )
            .await
            .unwrap();
        f.usecase
            .execute(
                &f.alice,
                SocketMessage::UpdateCursorPosition(UpdateCursorPositionPayload {
                    id: "u1".to_string(),
                    cursor_position: CursorPosition::new(12.0, 34.0),
                }),
            )
            .await
            .unwrap();

        // then (期待する結果):
        let snapshot = f.repository.snapshot(&lobby()).await;
        assert_eq!(snapshot.members[0].display_name, "Alice");
        assert_eq!(
            snapshot.members[0].cursor_position,
            CursorPosition::new(12.0, 34.0)
        );
        assert!(matches!(
            received(&mut f.bob_rx),
            SocketMessage::UpdateDisplayName(_)
        ));
        assert!(matches!(
            received(&mut f.bob_rx),
            SocketMessage::UpdateCursorPosition(_)
        ));
    }

    #[tokio::test]
    async fn test_presence_update_for_someone_else_is_rejected() {
        // テスト項目: 他人の id を名乗る UPDATE_DISPLAY_NAME は破棄される
        let mut f = setup().await;

        let result = f
            .usecase
            .execute(
                &f.alice,
                SocketMessage::UpdateDisplayName(UpdateDisplayNamePayload {
                    id: "u2".to_string(),
                    display_name: "Mallory".to_string(),
                }),
            )
            .await;

        assert!(matches!(result, Err(RelayError::IdentityMismatch { .. })));
        assert!(f.bob_rx.try_recv().is_err());
        assert_eq!(f.repository.snapshot(&lobby()).await.members[1].display_name, "u2");
    }

    #[tokio::test]
    async fn test_presence_update_from_superseded_connection_is_rejected() {
        // テスト項目: 置き換えられた古い接続からの UPDATE_DISPLAY_NAME は
        //             新しい接続のメンバー情報を上書きせず、配信もされない
        // given (前提条件):
        let mut f = setup().await;
        let (tx, _new_rx) = mpsc::unbounded_channel();
        let new_connection = ConnectionHandle::new(ConnectionIdFactory::generate(), tx);
        f.repository
            .join(
                &lobby(),
                Member::new(
                    f.alice.user_id.clone(),
                    "Alice (new)".to_string(),
                    "#3b82f6".to_string(),
                    Tool::Pen,
                    Timestamp::new(2000),
                    new_connection,
                ),
            )
            .await;

        // when (操作):
        let result = f
            .usecase
            .execute(
                &f.alice,
                SocketMessage::UpdateDisplayName(UpdateDisplayNamePayload {
                    id: "u1".to_string(),
                    display_name: "Stale".to_string(),
                }),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RelayError::Repository(RepositoryError::StaleConnection(_)))
        ));
        assert!(f.bob_rx.try_recv().is_err());
        assert_eq!(
            f.repository.snapshot(&lobby()).await.members[0].display_name,
            "Alice (new)"
        );
    }

    #[tokio::test]
    async fn test_server_only_kinds_are_not_relayed() {
        // テスト項目: USER_LEFT や CONNECT はクライアントから中継されない
        let mut f = setup().await;

        let left = f
            .usecase
            .execute(
                &f.alice,
                SocketMessage::UserLeft(UserLeftPayload {
                    id: "u2".to_string(),
                }),
            )
            .await;

        assert!(matches!(
            left,
            Err(RelayError::NotRelayable(MessageKind::UserLeft))
        ));
        assert!(f.bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_draw_update_has_no_effect() {
        // テスト項目: DRAW_UPDATE は受け付けるが何もしない（配信もしない）
        let mut f = setup().await;

        let delivered = f
            .usecase
            .execute(&f.alice, SocketMessage::DrawUpdate("M 0 0 L 1 1".to_string()))
            .await
            .unwrap();

        assert_eq!(delivered, 0);
        assert!(f.bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_shape_op_on_missing_room_is_an_error() {
        // テスト項目: Room が存在しない場合は RoomNotFound となり配信されない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(
            1000,
        ))));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_publish().never();
        let usecase = RelayMessageUseCase::new(
            repository,
            Arc::new(pusher),
            Arc::new(EventSequencer::new()),
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = MemberSession {
            user_id: UserId::new("u1".to_string()).unwrap(),
            room_id: lobby(),
            connection: ConnectionHandle::new(ConnectionIdFactory::generate(), tx),
        };

        // when (操作):
        let result = usecase
            .execute(&session, SocketMessage::AddShape(circle("s1", 0.0)))
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RelayError::Repository(RepositoryError::RoomNotFound(_)))
        ));
    }
}
