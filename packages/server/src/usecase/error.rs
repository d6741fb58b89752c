//! UseCase 層のエラー定義

use chalkboard_shared::protocol::{CodecError, MessageKind};
use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// CONNECT 処理のエラー
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[source] ValueObjectError),

    #[error("invalid user id: {0}")]
    InvalidUserId(#[source] ValueObjectError),

    #[error("failed to encode message: {0}")]
    Codec(#[from] CodecError),
}

/// 接続済みメンバーからのメッセージ中継のエラー
///
/// いずれもメッセージ単位で破棄されるだけで、接続は維持されます。
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0} cannot be relayed from a client")]
    NotRelayable(MessageKind),

    #[error("payload id '{payload_id}' does not match sender '{sender_id}'")]
    IdentityMismatch {
        payload_id: String,
        sender_id: String,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
