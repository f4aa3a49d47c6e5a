//! Shared error taxonomy for upstream provider calls.
//!
//! Every provider client in `core` reports failures through [`UpstreamError`]:
//! transport problems (including timeouts), non-success HTTP statuses, and
//! response bodies that cannot be parsed. A peer-initiated WebSocket close is
//! deliberately *not* represented here; disconnects are handled in the
//! connection handlers and never surface as errors.

use thiserror::Error;

/// Failure modes common to all upstream provider calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network-level failure: DNS, TLS, connection reset, and similar.
    #[error("transport error: {0}")]
    Transport(String),

    /// The bounded wait for the upstream call elapsed.
    #[error("upstream call timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("upstream returned {status}: {body}")]
    Status {
        status: http::StatusCode,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The provider answered 2xx but the body did not match the expected shape.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// Longest error-body excerpt kept for diagnostics.
const MAX_ERROR_BODY_LEN: usize = 512;

impl UpstreamError {
    /// Classify a `reqwest` error as timeout or transport failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }

    /// Build a `Status` error from a non-success response, keeping a bounded
    /// excerpt of the body for diagnostics.
    pub fn from_status(status: http::StatusCode, body: &str) -> Self {
        let mut body = body.to_string();
        if body.len() > MAX_ERROR_BODY_LEN {
            // Cut on a character boundary; anywhere inside a multibyte
            // character would panic.
            let mut cut = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        UpstreamError::Status { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let long_body = "x".repeat(10_000);
        let err = UpstreamError::from_status(http::StatusCode::BAD_GATEWAY, &long_body);
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, http::StatusCode::BAD_GATEWAY);
                assert_eq!(body.len(), MAX_ERROR_BODY_LEN);
            }
            _ => panic!("Expected Status variant"),
        }
    }

    #[test]
    fn test_status_body_truncates_on_char_boundary() {
        // 600 bytes of three-byte characters; byte 512 falls mid-character.
        let long_body = "€".repeat(200);
        let err = UpstreamError::from_status(http::StatusCode::BAD_GATEWAY, &long_body);
        match err {
            UpstreamError::Status { body, .. } => {
                assert!(body.len() <= MAX_ERROR_BODY_LEN);
                assert!(body.chars().all(|c| c == '€'));
            }
            _ => panic!("Expected Status variant"),
        }
    }

    #[test]
    fn test_display_includes_status() {
        let err = UpstreamError::from_status(http::StatusCode::TOO_MANY_REQUESTS, "slow down");
        let rendered = err.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("slow down"));
    }
}
