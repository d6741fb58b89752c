//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ConnectionHandle, Member, MemberUpdate, RepositoryError, Room, RoomId, RoomSnapshot,
    ShapeOperation, UserId,
};

/// Room Registry
///
/// The authoritative mapping of room → members and room → shapes.
/// Each operation is atomic with respect to the others.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert or overwrite the member for `(room_id, member.id)`, creating the
    /// room if absent.
    ///
    /// If another connection was registered for the same user, it is closed
    /// with `CloseReason::Replaced` and `true` is returned.
    async fn join(&self, room_id: &RoomId, member: Member) -> bool;

    /// Remove the member only if it is still bound to `connection`.
    ///
    /// Deletes the room, shapes included, once its last member leaves.
    /// Returns `true` if a member was removed.
    async fn leave(&self, room_id: &RoomId, user_id: &UserId, connection: &ConnectionHandle)
    -> bool;

    /// Current members and shapes (empty for an unknown room)
    async fn snapshot(&self, room_id: &RoomId) -> RoomSnapshot;

    /// Apply an ADD / UPDATE / REMOVE / CLEAR to a room's shapes
    async fn apply_shape_operation(
        &self,
        room_id: &RoomId,
        operation: ShapeOperation,
    ) -> Result<(), RepositoryError>;

    /// Mirror a presence update into the member record.
    ///
    /// Like `leave`, only applies while the member is still bound to
    /// `connection`.
    async fn update_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        connection: &ConnectionHandle,
        update: MemberUpdate,
    ) -> Result<(), RepositoryError>;

    /// All live rooms
    async fn get_rooms(&self) -> Vec<Room>;

    /// One room by id
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;
}
