//! Shared fixtures for end-to-end tests.
//!
//! Spins up the real gateway router on an ephemeral port with its provider
//! endpoints pointed at wiremock servers.

#![allow(dead_code)]

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use murmur_gateway::{AppState, ServerConfig, routes};
use tokio::net::TcpListener;

/// Model identifiers used by every test; provider mocks match on the
/// corresponding `/models/{id}` paths.
pub const CHAT_MODEL: &str = "test/chat";
pub const STT_MODEL: &str = "test/stt";
pub const TTS_MODEL: &str = "test/tts";

/// Build a config whose providers all live on `provider_base`.
pub fn test_config(provider_base: &str, auth_base: &str, audio_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        inference_base_url: provider_base.trim_end_matches('/').to_string(),
        inference_token: "test-token".to_string(),
        chat_model: CHAT_MODEL.to_string(),
        stt_model: STT_MODEL.to_string(),
        tts_model: TTS_MODEL.to_string(),
        auth_url: auth_base.trim_end_matches('/').to_string(),
        auth_anon_key: "test-anon-key".to_string(),
        upstream_timeout: Duration::from_secs(2),
        audio_output_dir: audio_dir,
        cors_allowed_origins: None,
    }
}

/// Assemble the full application router, exactly as `main` does.
pub fn build_app(config: ServerConfig) -> Router {
    let app_state = AppState::new(config);
    Router::new()
        .route(
            "/",
            axum::routing::get(murmur_gateway::handlers::api::health_check),
        )
        .merge(routes::api::create_api_router())
        .merge(routes::chat::create_chat_router())
        .merge(routes::voice::create_voice_router())
        .with_state(app_state)
}

/// Serve the app on an ephemeral port and return its address.
pub async fn spawn_app(config: ServerConfig) -> SocketAddr {
    let app = build_app(config);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, app).into_future());
    addr
}
