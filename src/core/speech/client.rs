//! Speech client: a stateless adapter pair over one STT and one TTS endpoint.
//!
//! In contrast to the inference client, failures here propagate as
//! [`SpeechError`]. A voice turn whose transcription failed must not proceed
//! to downstream calls, so the caller needs a real error, not a degraded
//! string.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::UpstreamError;

use super::messages::TranscriptionResponse;

/// Content type declared on speech-to-text uploads. The voice endpoint spools
/// chunks into a WAV container before transcription.
pub const STT_CONTENT_TYPE: &str = "audio/wav";

/// Audio format requested from the text-to-speech endpoint.
pub const TTS_ACCEPT: &str = "audio/flac";

/// Errors raised by the speech client.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("transcription failed: {0}")]
    Transcription(#[source] UpstreamError),

    #[error("synthesis failed: {0}")]
    Synthesis(#[source] UpstreamError),
}

/// Stateless client for one configured STT endpoint and one TTS endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    http: Client,
    base_url: String,
    token: String,
    stt_model: String,
    tts_model: String,
    timeout: Duration,
}

impl SpeechClient {
    pub fn new(
        base_url: String,
        token: String,
        stt_model: String,
        tts_model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token,
            stt_model,
            tts_model,
            timeout,
        }
    }

    fn model_endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    /// Post raw audio bytes with a declared content type and return the
    /// trimmed transcript.
    pub async fn transcribe(&self, audio: Bytes) -> Result<String, SpeechError> {
        debug!(bytes = audio.len(), model = %self.stt_model, "Sending audio for transcription");

        let response = self
            .http
            .post(self.model_endpoint(&self.stt_model))
            .bearer_auth(&self.token)
            .header(http::header::CONTENT_TYPE, STT_CONTENT_TYPE)
            .timeout(self.timeout)
            .body(audio)
            .send()
            .await
            .map_err(|e| SpeechError::Transcription(UpstreamError::from_transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Transcription(UpstreamError::from_status(
                status, &body,
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Transcription(UpstreamError::Malformed(e.to_string())))?;

        let transcript = parsed.text.trim().to_string();
        info!(model = %self.stt_model, chars = transcript.len(), "Transcription complete");
        Ok(transcript)
    }

    /// Post `{"inputs": text}` to the TTS endpoint and return the raw audio
    /// bytes of the response.
    pub async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        debug!(chars = text.len(), model = %self.tts_model, "Requesting speech synthesis");

        let response = self
            .http
            .post(self.model_endpoint(&self.tts_model))
            .bearer_auth(&self.token)
            .header(http::header::ACCEPT, TTS_ACCEPT)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(UpstreamError::from_transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Synthesis(UpstreamError::from_status(
                status, &body,
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Synthesis(UpstreamError::from_transport(e)))?;

        info!(model = %self.tts_model, bytes = audio.len(), "Synthesis complete");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> SpeechClient {
        SpeechClient::new(
            "http://localhost:9000".to_string(),
            "tok".to_string(),
            "acme/stt".to_string(),
            "acme/tts".to_string(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_model_endpoints() {
        let client = test_client();
        assert_eq!(
            client.model_endpoint(&client.stt_model),
            "http://localhost:9000/models/acme/stt"
        );
        assert_eq!(
            client.model_endpoint(&client.tts_model),
            "http://localhost:9000/models/acme/tts"
        );
    }

    #[test]
    fn test_error_variants_name_the_stage() {
        let err = SpeechError::Transcription(UpstreamError::Timeout);
        assert!(err.to_string().starts_with("transcription failed"));
        let err = SpeechError::Synthesis(UpstreamError::Timeout);
        assert!(err.to_string().starts_with("synthesis failed"));
    }
}
