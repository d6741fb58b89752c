//! Collaborative whiteboard server.
//!
//! Keeps the authoritative shapes and members of every room in memory and
//! relays changes between the clients connected to the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chalkboard-server
//! cargo run --bin chalkboard-server -- --host 0.0.0.0 --port 3000 --default-room lobby
//! ```

use std::sync::Arc;

use chalkboard_server::{
    domain::RoomId,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, EventSequencer, GetRoomDetailUseCase,
        GetRoomsUseCase, RelayMessageUseCase,
    },
};
use chalkboard_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chalkboard-server")]
#[command(about = "Collaborative whiteboard room-state sync server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Room used when a connection names none
    #[arg(long, default_value = "lobby")]
    default_room: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let default_room = match RoomId::new(args.default_room) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::error!("Invalid --default-room: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory database)
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryRoomRepository::new(clock.clone()));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases (connection events share one sequencer)
    let sequencer = Arc::new(EventSequencer::new());
    let connect_member_usecase = Arc::new(ConnectMemberUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
        clock,
    ));
    let disconnect_member_usecase = Arc::new(DisconnectMemberUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        repository.clone(),
        message_pusher,
        sequencer,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(
        connect_member_usecase,
        disconnect_member_usecase,
        relay_message_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        default_room,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
