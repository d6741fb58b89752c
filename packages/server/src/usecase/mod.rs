//! UseCase layer: one struct per connection event or query.

pub mod connect_member;
pub mod disconnect_member;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod relay_message;
pub mod sequencer;

pub use connect_member::{ConnectMemberUseCase, MemberSession};
pub use disconnect_member::DisconnectMemberUseCase;
pub use error::{ConnectError, RelayError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use relay_message::RelayMessageUseCase;
pub use sequencer::EventSequencer;
