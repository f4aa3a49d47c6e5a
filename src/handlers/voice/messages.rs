//! Voice chat wire format.
//!
//! Inbound units are raw binary audio frames, one complete utterance per
//! frame. Outbound JSON messages are tagged; each processed chunk produces a
//! `transcript` progress message once transcription completes, then a
//! `voice_reply` followed by one binary frame carrying the synthesized audio.

use bytes::Bytes;
use serde::Serialize;

/// Outbound WebSocket messages on the voice endpoint.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum VoiceOutgoingMessage {
    /// Transcript progress for the chunk currently being processed.
    #[serde(rename = "transcript")]
    Transcript { text: String },

    /// Completed voice turn. The synthesized audio follows as one binary
    /// frame; `audio_path` references where it was persisted server-side.
    #[serde(rename = "voice_reply")]
    VoiceReply {
        transcript: String,
        response: String,
        audio_path: String,
    },

    /// Unit-scoped error: this chunk failed, the session continues.
    #[serde(rename = "error")]
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        message: String,
    },
}

/// Routing for the sender task.
pub enum VoiceMessageRoute {
    Outgoing(VoiceOutgoingMessage),
    /// Synthesized reply audio.
    Audio(Bytes),
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_serialization() {
        let msg = VoiceOutgoingMessage::Transcript {
            text: "hello".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"transcript""#));
        assert!(json.contains(r#""text":"hello""#));
    }

    #[test]
    fn test_voice_reply_serialization() {
        let msg = VoiceOutgoingMessage::VoiceReply {
            transcript: "hello".to_string(),
            response: "hi there".to_string(),
            audio_path: "/tmp/reply.flac".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"voice_reply""#));
        assert!(json.contains(r#""transcript":"hello""#));
        assert!(json.contains(r#""response":"hi there""#));
        assert!(json.contains(r#""audio_path":"/tmp/reply.flac""#));
    }

    #[test]
    fn test_error_omits_absent_code() {
        let msg = VoiceOutgoingMessage::Error {
            code: None,
            message: "transcription failed".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(!json.contains("code"));
    }
}
