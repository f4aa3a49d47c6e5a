//! Voice chat WebSocket handler.
//!
//! Each inbound binary frame is one complete utterance. The loop runs the
//! full voice turn for a chunk before polling the next frame, so reply pairs
//! leave in chunk order. A failed turn produces one unit-scoped error message
//! and the session keeps going; only a peer disconnect or an unusable socket
//! ends the loop.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::session::{SessionError, SessionPipeline};
use crate::core::speech::SpeechError;
use crate::state::AppState;

use super::messages::{VoiceMessageRoute, VoiceOutgoingMessage};

/// Channel buffer sized for audio workloads.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Maximum WebSocket frame/message size (10 MB) for audio uploads.
const MAX_WS_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Voice chat WebSocket handler.
pub async fn voice_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.max_frame_size(MAX_WS_MESSAGE_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_voice_socket(socket, state))
}

async fn handle_voice_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "Voice connection established");

    let (mut sender, mut receiver) = socket.split();
    let (message_tx, mut message_rx) = mpsc::channel::<VoiceMessageRoute>(CHANNEL_BUFFER_SIZE);

    let sender_task = tokio::spawn(async move {
        while let Some(route) = message_rx.recv().await {
            let result = match route {
                VoiceMessageRoute::Outgoing(message) => match serde_json::to_string(&message) {
                    Ok(json) => sender.send(Message::Text(json.into())).await,
                    Err(e) => {
                        error!("Failed to serialize outgoing voice message: {}", e);
                        continue;
                    }
                },
                VoiceMessageRoute::Audio(audio) => sender.send(Message::Binary(audio)).await,
                VoiceMessageRoute::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };

            if let Err(e) = result {
                debug!("Voice send failed, peer likely gone: {}", e);
                break;
            }
        }
    });

    let pipeline = SessionPipeline::new(
        app_state.inference.clone(),
        app_state.speech.clone(),
        app_state.config.audio_output_dir.clone(),
    );

    // Single unit in flight per connection; the next frame waits for this
    // chunk's turn to finish.
    while let Some(msg_result) = receiver.next().await {
        match msg_result {
            Ok(msg) => {
                if !process_voice_message(msg, &pipeline, &message_tx).await {
                    break;
                }
            }
            Err(e) => {
                warn!(%connection_id, "Voice WebSocket error: {}", e);
                break;
            }
        }
    }

    // Clean shutdown: route a close frame through the sender task and wait
    // for it to drain. If the peer is already gone the send inside the task
    // fails and it exits on its own.
    let _ = message_tx.send(VoiceMessageRoute::Close).await;
    drop(message_tx);
    let _ = sender_task.await;
    info!(%connection_id, "Voice connection closed");
}

/// Process one frame. Returns false when the connection should terminate.
async fn process_voice_message(
    msg: Message,
    pipeline: &SessionPipeline,
    message_tx: &mpsc::Sender<VoiceMessageRoute>,
) -> bool {
    match msg {
        Message::Binary(chunk) => {
            debug!(bytes = chunk.len(), "Received audio chunk");
            run_voice_turn(chunk, pipeline, message_tx).await
        }
        Message::Text(_) => {
            let _ = message_tx
                .send(VoiceMessageRoute::Outgoing(VoiceOutgoingMessage::Error {
                    code: Some("protocol_error".to_string()),
                    message: "voice endpoint accepts binary audio frames only".to_string(),
                }))
                .await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            debug!("Voice close frame received");
            false
        }
    }
}

/// Drive one chunk through the pipeline, emitting progress and the reply.
///
/// Errors are contained to this unit: the client gets one error message and
/// the loop continues.
async fn run_voice_turn(
    chunk: Bytes,
    pipeline: &SessionPipeline,
    message_tx: &mpsc::Sender<VoiceMessageRoute>,
) -> bool {
    let transcript = match pipeline.transcribe_chunk(chunk).await {
        Ok(transcript) => transcript,
        Err(e) => return send_turn_error(e, message_tx).await,
    };

    let _ = message_tx
        .send(VoiceMessageRoute::Outgoing(
            VoiceOutgoingMessage::Transcript {
                text: transcript.clone(),
            },
        ))
        .await;

    let turn = match pipeline.reply_for_transcript(&transcript).await {
        Ok(turn) => turn,
        Err(e) => return send_turn_error(e, message_tx).await,
    };

    let reply_sent = message_tx
        .send(VoiceMessageRoute::Outgoing(
            VoiceOutgoingMessage::VoiceReply {
                transcript: turn.transcript,
                response: turn.response_text,
                audio_path: turn.audio_path.display().to_string(),
            },
        ))
        .await
        .is_ok();

    let audio_sent = message_tx
        .send(VoiceMessageRoute::Audio(turn.audio))
        .await
        .is_ok();

    reply_sent && audio_sent
}

/// Report a failed turn to the client. Always returns true: one bad chunk
/// must not kill a long-lived session.
async fn send_turn_error(
    error: SessionError,
    message_tx: &mpsc::Sender<VoiceMessageRoute>,
) -> bool {
    warn!("Voice turn failed: {}", error);
    let code = match &error {
        SessionError::Speech(SpeechError::Transcription(_)) => "transcription_error",
        SessionError::Speech(SpeechError::Synthesis(_)) => "synthesis_error",
        SessionError::Io(_) => "audio_io_error",
    };
    let _ = message_tx
        .send(VoiceMessageRoute::Outgoing(VoiceOutgoingMessage::Error {
            code: Some(code.to_string()),
            message: error.to_string(),
        }))
        .await;
    true
}
