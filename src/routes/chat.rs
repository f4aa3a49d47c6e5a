//! Text chat WebSocket route configuration.
//!
//! # Endpoint
//!
//! `GET /ws` - WebSocket upgrade for text chat
//!
//! # Protocol
//!
//! After upgrade, the client sends JSON units `{"message": "..."}` and the
//! server answers each with exactly one `{"response": "..."}`, in order.
//! Failures for a single unit come back as a reply whose text starts with
//! `Error:`; the connection stays open.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::chat::chat_handler;
use crate::state::AppState;
use std::sync::Arc;

pub fn create_chat_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(chat_handler))
        .layer(TraceLayer::new_for_http())
}
