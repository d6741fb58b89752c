//! UseCase: メンバー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectMemberUseCase::open() / execute() メソッド
//! - CONNECT による Room への参加、USER_JOINED の配信、INITIAL_STATE の送信
//!
//! ### なぜこのテストが必要か
//! - 参加者のスナップショットには本人を含める必要がある
//! - USER_JOINED は本人以外にだけ届く必要がある
//! - 同じ user id での再接続は古い接続を置き換える
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規メンバーの接続、既存メンバーがいるルームへの接続
//! - 正常系：id 省略時の自動採番、パスと異なるルームへの参加
//! - 異常系：長すぎる room id

use std::sync::Arc;

use chalkboard_shared::{
    protocol::{ConnectPayload, InitialStatePayload, SocketMessage, Tool, UserJoinedPayload, encode},
    time::Clock,
};

use crate::{
    domain::{
        ConnectionHandle, Member, MessagePusher, RoomId, RoomRepository, Timestamp, UserId,
        UserIdFactory,
    },
    infrastructure::dto::conversion::member_to_user,
};

use super::{error::ConnectError, sequencer::EventSequencer};

/// CONNECT 済みの接続が持つ識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSession {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub connection: ConnectionHandle,
}

/// メンバー接続のユースケース
pub struct ConnectMemberUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<EventSequencer>,
    clock: Arc<dyn Clock>,
}

impl ConnectMemberUseCase {
    /// 新しい ConnectMemberUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<EventSequencer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
            clock,
        }
    }

    /// 接続直後（CONNECT 前）にパスで指定されたルームの配信を購読する
    pub async fn open(&self, room_id: &RoomId, connection: ConnectionHandle) {
        let _guard = self.sequencer.enter().await;
        self.message_pusher.subscribe(room_id, connection).await;
    }

    /// CONNECT を処理してメンバーを Room に参加させる
    ///
    /// # Arguments
    ///
    /// * `subscribed_room` - 現在購読しているルーム（パスから決定したもの）
    /// * `connection` - この接続のハンドル
    /// * `payload` - CONNECT の payload
    ///
    /// # Returns
    ///
    /// * `Ok(MemberSession)` - 参加成功
    /// * `Err(ConnectError)` - room id / user id が不正
    pub async fn execute(
        &self,
        subscribed_room: &RoomId,
        connection: &ConnectionHandle,
        payload: ConnectPayload,
    ) -> Result<MemberSession, ConnectError> {
        let _guard = self.sequencer.enter().await;

        // 1. 識別情報の検証
        let room_id = if payload.room_id.trim().is_empty() {
            subscribed_room.clone()
        } else {
            RoomId::new(payload.room_id).map_err(ConnectError::InvalidRoomId)?
        };
        let user_id = match payload.id {
            Some(id) if !id.trim().is_empty() => {
                UserId::new(id).map_err(ConnectError::InvalidUserId)?
            }
            _ => UserIdFactory::generate(),
        };
        let current_tool = payload.current_tool.parse::<Tool>().unwrap_or_else(|e| {
            tracing::warn!("{}, falling back to '{}'", e, Tool::default());
            Tool::default()
        });

        // 2. CONNECT で指定されたルームへ購読を移す
        if &room_id != subscribed_room {
            self.message_pusher
                .unsubscribe(subscribed_room, &connection.id())
                .await;
            self.message_pusher
                .subscribe(&room_id, connection.clone())
                .await;
        }

        // 3. Room に参加（同じ id の古い接続は置き換えられる）
        let member = Member::new(
            user_id.clone(),
            payload.display_name,
            payload.cursor_color,
            current_tool,
            Timestamp::new(self.clock.now_millis()),
            connection.clone(),
        );
        let joined = SocketMessage::UserJoined(UserJoinedPayload::from(&member));
        let superseded = self.repository.join(&room_id, member).await;
        tracing::info!(
            "User '{}' joined room '{}' on connection {}{}",
            user_id,
            room_id,
            connection.id(),
            if superseded { " (replaced previous connection)" } else { "" }
        );

        // 4. 本人以外に USER_JOINED を配信
        let joined = encode(&joined)?;
        self.message_pusher
            .publish(&room_id, &joined, Some(connection.id()))
            .await;

        // 5. 本人にだけ INITIAL_STATE を送信
        let snapshot = self.repository.snapshot(&room_id).await;
        let initial_state = SocketMessage::InitialState(InitialStatePayload {
            shapes: snapshot.shapes,
            users: snapshot
                .members
                .iter()
                .map(|m| member_to_user(m, &room_id))
                .collect(),
        });
        let initial_state = encode(&initial_state)?;
        if let Err(e) = self.message_pusher.push_to(connection, &initial_state).await {
            tracing::warn!("Failed to send initial state to '{}': {}", user_id, e);
        }

        Ok(MemberSession {
            user_id,
            room_id,
            connection: connection.clone(),
        })
    }
}
