//! One WebSocket session: from socket open to close or error.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use chalkboard_shared::protocol::encode;

use crate::{
    app::ClientApp,
    connection::ConnectionStatus,
    domain::{close_error, session_url},
    error::ClientError,
    formatter::MessageFormatter,
    ui::show,
};

/// Run the WebSocket client session.
///
/// Returns `Ok(())` when the user closes the input, otherwise the reason the
/// session ended.
pub async fn run_client_session(
    app: &mut ClientApp,
    base_url: &str,
    prompt: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = session_url(base_url, app.room());

    let (ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| ClientError::ConnectFailed(e.to_string()))?;

    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    app.connection().attach(outbound_tx);
    show(
        &MessageFormatter::format_status(ConnectionStatus::Connecting, app.room()),
        prompt,
    );

    // CONNECT must be the first frame on the socket
    let connect = encode(&app.connect_message())
        .map_err(|e| ClientError::ConnectFailed(e.to_string()))?;
    write
        .send(Message::text(connect))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(output) = app.handle_incoming(text.as_str()) {
                        show(&output, prompt);
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection");
                    return Err(match frame {
                        Some(frame) => close_error(u16::from(frame.code), frame.reason.as_str()),
                        None => ClientError::ConnectionLost("closed by server".to_string()),
                    });
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost(e.to_string()));
                }
                None => {
                    return Err(ClientError::ConnectionLost("stream ended".to_string()));
                }
            },
            Some(json) = outbound_rx.recv() => {
                if let Err(e) = write.send(Message::text(json)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    return Err(ClientError::ConnectionLost(e.to_string()));
                }
            }
            line = input_rx.recv() => match line {
                Some(line) => show(&app.handle_line(&line), prompt),
                None => {
                    write.close().await.ok();
                    return Ok(());
                }
            },
        }
    }
}
