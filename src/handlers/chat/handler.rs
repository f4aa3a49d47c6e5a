//! Text chat WebSocket handler.
//!
//! Owns the accept/receive/send loop for one text connection. Inbound units
//! are processed strictly one at a time: the loop awaits the pipeline before
//! polling the socket again, so replies always leave in request order.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::session::SessionPipeline;
use crate::state::AppState;

use super::messages::{ChatIncomingMessage, ChatMessageRoute, ChatOutgoingMessage};

/// Channel buffer for outgoing messages.
const CHANNEL_BUFFER_SIZE: usize = 64;

/// Maximum WebSocket message size (1 MB). Text frames only on this endpoint.
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

/// Text chat WebSocket handler.
///
/// Upgrades the HTTP connection and runs the per-connection loop until the
/// peer disconnects.
pub async fn chat_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_chat_socket(socket, state))
}

async fn handle_chat_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "Chat connection established");

    let (mut sender, mut receiver) = socket.split();
    let (message_tx, mut message_rx) = mpsc::channel::<ChatMessageRoute>(CHANNEL_BUFFER_SIZE);

    // Sender task: serializes already-ordered results onto the wire.
    let sender_task = tokio::spawn(async move {
        while let Some(route) = message_rx.recv().await {
            let result = match route {
                ChatMessageRoute::Outgoing(message) => match serde_json::to_string(&message) {
                    Ok(json) => sender.send(Message::Text(json.into())).await,
                    Err(e) => {
                        error!("Failed to serialize outgoing chat message: {}", e);
                        continue;
                    }
                },
                ChatMessageRoute::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };

            if let Err(e) = result {
                debug!("Chat send failed, peer likely gone: {}", e);
                break;
            }
        }
    });

    let pipeline = SessionPipeline::new(
        app_state.inference.clone(),
        app_state.speech.clone(),
        app_state.config.audio_output_dir.clone(),
    );

    // One unit in flight at a time: the next frame is not polled until this
    // one has been fully processed and its reply queued.
    while let Some(msg_result) = receiver.next().await {
        match msg_result {
            Ok(msg) => {
                if !process_chat_message(msg, &pipeline, &message_tx).await {
                    break;
                }
            }
            Err(e) => {
                warn!(%connection_id, "Chat WebSocket error: {}", e);
                break;
            }
        }
    }

    // Clean shutdown: route a close frame through the sender task and wait
    // for it to drain. If the peer is already gone the send inside the task
    // fails and it exits on its own.
    let _ = message_tx.send(ChatMessageRoute::Close).await;
    drop(message_tx);
    let _ = sender_task.await;
    info!(%connection_id, "Chat connection closed");
}

/// Process one frame. Returns false when the connection should terminate.
async fn process_chat_message(
    msg: Message,
    pipeline: &SessionPipeline,
    message_tx: &mpsc::Sender<ChatMessageRoute>,
) -> bool {
    match msg {
        Message::Text(text) => {
            let incoming: ChatIncomingMessage = match serde_json::from_str(&text) {
                Ok(msg) => msg,
                Err(e) => {
                    // Malformed unit: answer it, keep the session.
                    debug!("Malformed chat message: {}", e);
                    let _ = message_tx
                        .send(ChatMessageRoute::Outgoing(ChatOutgoingMessage::error(
                            format!("invalid message: {e}"),
                        )))
                        .await;
                    return true;
                }
            };

            let response = pipeline.handle_text(&incoming.message).await;
            message_tx
                .send(ChatMessageRoute::Outgoing(ChatOutgoingMessage::reply(
                    response,
                )))
                .await
                .is_ok()
        }
        Message::Binary(_) => {
            let _ = message_tx
                .send(ChatMessageRoute::Outgoing(ChatOutgoingMessage::error(
                    "binary frames are not accepted on the text endpoint",
                )))
                .await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            debug!("Chat close frame received");
            false
        }
    }
}
