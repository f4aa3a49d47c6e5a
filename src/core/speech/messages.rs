//! Wire types for the speech APIs.

use serde::Deserialize;

/// Speech-to-text response body: `{"text": "..."}`.
#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcription_deserialization() {
        let response: TranscriptionResponse =
            serde_json::from_str(r#"{"text": " hello world "}"#).unwrap();
        assert_eq!(response.text, " hello world ");
    }

    #[test]
    fn test_missing_text_defaults_to_empty() {
        let response: TranscriptionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text, "");
    }
}
