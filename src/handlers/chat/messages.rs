//! Text chat wire format.
//!
//! The text endpoint keeps the flat shape clients already speak:
//! inbound `{"message": "..."}`, outbound `{"response": "..."}`. Per-unit
//! errors are delivered as a normal reply whose text carries the error
//! description, so one bad message never costs the connection.

use serde::{Deserialize, Serialize};

/// Inbound unit on the text endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatIncomingMessage {
    /// The user's message. Absent fields deserialize to an empty string,
    /// which is forwarded upstream unchanged (boundary case, not an error).
    #[serde(default)]
    pub message: String,
}

/// Outbound unit on the text endpoint.
#[derive(Debug, Serialize)]
pub struct ChatOutgoingMessage {
    pub response: String,
}

impl ChatOutgoingMessage {
    pub fn reply(response: String) -> Self {
        Self { response }
    }

    /// Unit-scoped error, delivered in the same shape as a normal reply.
    pub fn error(detail: impl std::fmt::Display) -> Self {
        Self {
            response: format!("Error: {detail}"),
        }
    }
}

/// Routing for the sender task.
pub enum ChatMessageRoute {
    Outgoing(ChatOutgoingMessage),
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_deserialization() {
        let msg: ChatIncomingMessage = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(msg.message, "hello");
    }

    #[test]
    fn test_missing_message_field_defaults_to_empty() {
        let msg: ChatIncomingMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(msg.message, "");
    }

    #[test]
    fn test_reply_serialization() {
        let json = serde_json::to_string(&ChatOutgoingMessage::reply("hi there".into())).unwrap();
        assert_eq!(json, r#"{"response":"hi there"}"#);
    }

    #[test]
    fn test_error_reply_is_tagged_in_text() {
        let json = serde_json::to_string(&ChatOutgoingMessage::error("bad frame")).unwrap();
        assert_eq!(json, r#"{"response":"Error: bad frame"}"#);
    }
}
