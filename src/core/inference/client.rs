//! Text-generation client.
//!
//! Unlike the speech client, this client never returns an `Err`: transport
//! failures, timeouts, and non-success statuses all collapse into
//! [`Completion::Degraded`] carrying a human-readable description. The text
//! chat path surfaces that description to the user as a normal reply, so a
//! flaky upstream degrades the conversation instead of terminating the
//! connection. Callers that need to distinguish the cases match on the
//! variant rather than inspecting the string.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::UpstreamError;

use super::messages::normalize_response;

/// Outcome of a text-generation call.
///
/// Both variants carry text destined for the end user; `Degraded` marks that
/// the upstream call failed and the text describes the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The provider answered; the string is the generated reply.
    Reply(String),
    /// The call failed; the string is an error description for the user.
    Degraded(String),
}

impl Completion {
    /// The user-visible text, regardless of outcome. Degraded results are
    /// prefixed so clients can render them distinctly.
    pub fn into_text(self) -> String {
        match self {
            Completion::Reply(text) => text,
            Completion::Degraded(detail) => format!("Error: {detail}"),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Completion::Degraded(_))
    }
}

/// Stateless client for one configured text-generation endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    base_url: String,
    token: String,
    model: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(base_url: String, token: String, model: String, timeout: Duration) -> Self {
        Self {
            // Pooled client; per-request timeout applied in `complete`.
            http: Client::new(),
            base_url,
            token,
            model,
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Send `prompt` to the configured model and normalize the response.
    ///
    /// An empty prompt is a boundary case, not an error: it is sent upstream
    /// unchanged and the provider decides what to make of it.
    pub async fn complete(&self, prompt: &str) -> Completion {
        let result = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "inputs": prompt }))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                let err = UpstreamError::from_transport(err);
                warn!(model = %self.model, error = %err, "Inference call failed");
                return Completion::Degraded(format!("failed to reach inference provider: {err}"));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                let err = UpstreamError::from_transport(err);
                warn!(model = %self.model, error = %err, "Failed to read inference response");
                return Completion::Degraded(format!("failed to read inference response: {err}"));
            }
        };

        if !status.is_success() {
            let err = UpstreamError::from_status(status, &body);
            warn!(model = %self.model, error = %err, "Inference provider returned error status");
            return Completion::Degraded(err.to_string());
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => {
                let text = normalize_response(&value);
                debug!(model = %self.model, chars = text.len(), "Inference reply normalized");
                Completion::Reply(text)
            }
            Err(err) => {
                warn!(model = %self.model, error = %err, "Inference response was not JSON");
                Completion::Degraded(UpstreamError::Malformed(err.to_string()).to_string())
            }
        }
    }
}
