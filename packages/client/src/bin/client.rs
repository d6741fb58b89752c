//! Command-line whiteboard client with reconnection support.
//!
//! Joins a room, prints what other users draw and lets you draw with simple
//! commands (`circle 10 10 5`, `move <id> 20 20`, `help`, ...).
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval) and keeps edits local while offline.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chalkboard-client -- --name Alice
//! cargo run --bin chalkboard-client -- -r design-review -n Bob --color '#ef4444'
//! ```

use clap::Parser;

use chalkboard_client::{ClientConfig, run_client};
use chalkboard_shared::{logger::setup_logger, protocol::DEFAULT_CURSOR_COLOR};

#[derive(Parser, Debug)]
#[command(name = "chalkboard-client")]
#[command(about = "Collaborative whiteboard client", long_about = None)]
struct Args {
    /// WebSocket server URL (the room is appended as a path segment)
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Room to join
    #[arg(short = 'r', long, default_value = "lobby")]
    room: String,

    /// Display name shown to other users
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Stable user id; generated when omitted
    #[arg(long)]
    user_id: Option<String>,

    /// Cursor color (also used as the stroke color of new shapes)
    #[arg(long, default_value = DEFAULT_CURSOR_COLOR)]
    color: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let user_id = args
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let display_name = args
        .name
        .unwrap_or_else(|| format!("user-{}", user_id.chars().take(8).collect::<String>()));

    let config = ClientConfig {
        url: args.url,
        room: args.room,
        user_id,
        display_name,
        cursor_color: args.color,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
