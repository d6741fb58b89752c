//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::RoomId,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        RelayMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectMemberUseCase（CONNECT 処理のユースケース）
    pub connect_member_usecase: Arc<ConnectMemberUseCase>,
    /// DisconnectMemberUseCase（切断処理のユースケース）
    pub disconnect_member_usecase: Arc<DisconnectMemberUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// パスにもクエリにもルームの指定がない場合のルーム
    pub default_room: RoomId,
}
