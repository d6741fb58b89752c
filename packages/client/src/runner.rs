//! Client execution logic with reconnection support.

use std::time::Duration;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    app::ClientApp,
    connection::ConnectionStatus,
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    formatter::MessageFormatter,
    session::run_client_session,
    ui::show,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Settings for one client process
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint without the room, e.g. `ws://127.0.0.1:3000/ws`
    pub url: String,
    pub room: String,
    pub user_id: String,
    pub display_name: String,
    pub cursor_color: String,
}

/// Run the whiteboard client with reconnection logic.
///
/// Between attempts the client keeps working in local-only mode.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let mut app = ClientApp::new(&config);
    let prompt = format!("{}> ", config.room);
    let mut input_rx = spawn_readline(prompt.clone());
    let mut failed_attempts = 0;

    println!(
        "\nYou are '{}' ({}). Type 'help' for commands. Press Ctrl+C to exit.\n",
        config.display_name, config.user_id
    );

    loop {
        tracing::info!(
            "Attempting to connect to {} room '{}' as '{}' (attempt {}/{})",
            config.url,
            config.room,
            config.user_id,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result = run_client_session(&mut app, &config.url, &prompt, &mut input_rx).await;
        app.connection().detach();

        let error = match result {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        if should_exit_immediately(&error) {
            tracing::error!("{}. Exiting.", error);
            return Err(error);
        }

        // 一度つながっていれば再試行回数をリセットする
        if matches!(error, ClientError::ConnectionLost(_)) {
            failed_attempts = 0;
        }
        tracing::warn!("{}", error);
        failed_attempts += 1;

        if !should_attempt_reconnect(&error, failed_attempts, MAX_RECONNECT_ATTEMPTS) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                MAX_RECONNECT_ATTEMPTS
            );
            return Err(error);
        }

        show(
            &MessageFormatter::format_status(ConnectionStatus::Local, &config.room),
            &prompt,
        );
        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let wait = tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS));
        tokio::pin!(wait);
        loop {
            tokio::select! {
                _ = &mut wait => break,
                line = input_rx.recv() => match line {
                    Some(line) => show(&app.handle_line(&line), &prompt),
                    None => return Ok(()),
                },
            }
        }
    }
}

/// Read lines on a blocking thread (rustyline is synchronous) and forward
/// them over a channel. The channel closes on Ctrl+C or Ctrl+D.
fn spawn_readline(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
