//! Identity-provider client.
//!
//! Thin pass-through over the external auth service: requests are forwarded
//! with the anonymous API key and the provider's JSON comes back verbatim.
//! Nothing in the core interprets these bodies.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::errors::UpstreamError;

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    anon_key: String,
    timeout: Duration,
}

impl AuthClient {
    pub fn new(base_url: String, anon_key: String, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url,
            anon_key,
            timeout,
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.post(
            format!("{}/signup", self.base_url),
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.post(
            format!("{}/token?grant_type=password", self.base_url),
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn post(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, UpstreamError> {
        debug!(url = %url, "Forwarding request to identity provider");
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(UpstreamError::from_transport)?;

        // The provider expresses auth failures inside its JSON body; any
        // parseable body is passed through regardless of status.
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))
    }
}
