//! REST handlers: health check and identity pass-through.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::errors::UpstreamError;
use crate::state::AppState;

/// Health check for load balancers and smoke tests.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "murmur-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Credentials accepted by the identity pass-through endpoints.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /auth/signup` — forwarded to the identity provider verbatim.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> impl IntoResponse {
    match state
        .auth
        .sign_up(&credentials.email, &credentials.password)
        .await
    {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => upstream_failure("sign-up", e),
    }
}

/// `POST /auth/signin` — forwarded to the identity provider verbatim.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> impl IntoResponse {
    match state
        .auth
        .sign_in(&credentials.email, &credentials.password)
        .await
    {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => upstream_failure("sign-in", e),
    }
}

fn upstream_failure(operation: &str, error: UpstreamError) -> (StatusCode, Json<serde_json::Value>) {
    warn!(operation, error = %error, "Identity provider call failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": format!("identity provider {operation} failed: {error}") })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_body() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_credentials_deserialization() {
        let creds: Credentials =
            serde_json::from_str(r#"{"email": "a@b.c", "password": "hunter2"}"#).unwrap();
        assert_eq!(creds.email, "a@b.c");
        assert_eq!(creds.password, "hunter2");
    }
}
