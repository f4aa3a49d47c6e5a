//! Voice chat WebSocket route configuration.
//!
//! # Endpoint
//!
//! `GET /ws/voice` - WebSocket upgrade for voice chat
//!
//! # Protocol
//!
//! After upgrade, the client sends raw binary audio frames, one complete
//! utterance per frame. For each frame the server sends, in order:
//!
//! 1. `{"type": "transcript", "text": "..."}` once transcription completes
//! 2. `{"type": "voice_reply", "transcript", "response", "audio_path"}`
//! 3. one binary frame with the synthesized reply audio
//!
//! A failed frame produces a single `{"type": "error", ...}` message and the
//! session continues.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::voice::voice_handler;
use crate::state::AppState;
use std::sync::Arc;

pub fn create_voice_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws/voice", get(voice_handler))
        .layer(TraceLayer::new_for_http())
}
