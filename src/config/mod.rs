//! Configuration module for the murmur gateway.
//!
//! Configuration is read once at process start from environment variables
//! (after an optional `.env` file has been loaded by `main`) and is read-only
//! afterwards. It is injected into the provider clients and the connection
//! handlers through [`crate::state::AppState`]; request handling never reads
//! ambient process state.
//!
//! Missing required variables fail fast at boot, and every absent name is
//! reported in one error instead of surfacing later as a confusing upstream
//! 401.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default base URL for the hosted inference API (text generation, STT, TTS).
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default text-generation model.
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-ai/DeepSeek-R1-0528";

/// Default speech-to-text model.
pub const DEFAULT_STT_MODEL: &str = "openai/whisper-large-v3";

/// Default text-to-speech model.
pub const DEFAULT_TTS_MODEL: &str = "facebook/fastspeech2-en-ljspeech";

/// Default bounded wait for any upstream provider call, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    /// A variable was present but could not be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Server configuration.
///
/// Contains everything needed to run the gateway:
/// - server settings (host, port, CORS)
/// - upstream provider endpoints and models
/// - credentials (inference bearer token, identity-provider anonymous key)
/// - the bounded wait applied to every upstream call
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// Base URL of the hosted inference API serving all three model kinds.
    pub inference_base_url: String,
    /// Bearer credential for the inference API.
    pub inference_token: String,
    /// Text-generation model identifier.
    pub chat_model: String,
    /// Speech-to-text model identifier.
    pub stt_model: String,
    /// Text-to-speech model identifier.
    pub tts_model: String,

    /// Identity provider base URL (auth endpoints live under `/auth/v1`).
    pub auth_url: String,
    /// Anonymous/public API key for the identity provider.
    pub auth_anon_key: String,

    /// Bounded wait for every upstream provider call.
    pub upstream_timeout: Duration,

    /// Directory where synthesized voice replies are written.
    pub audio_output_dir: PathBuf,

    /// CORS allowed origins (comma-separated list or "*" for all).
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables, failing fast when any
    /// required variable is unset.
    ///
    /// Required: `HF_TOKEN`, `AUTH_URL`, `AUTH_ANON_KEY`. Everything else has
    /// a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let inference_token = require_env("HF_TOKEN", &mut missing);
        let auth_url = require_env("AUTH_URL", &mut missing);
        let auth_anon_key = require_env("AUTH_ANON_KEY", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 8000,
        };

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            host: env_or("HOST", "127.0.0.1"),
            port,
            inference_base_url: trim_trailing_slash(env_or(
                "INFERENCE_BASE_URL",
                DEFAULT_INFERENCE_BASE_URL,
            )),
            inference_token,
            chat_model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            stt_model: env_or("STT_MODEL", DEFAULT_STT_MODEL),
            tts_model: env_or("TTS_MODEL", DEFAULT_TTS_MODEL),
            auth_url: trim_trailing_slash(auth_url),
            auth_anon_key,
            upstream_timeout: Duration::from_secs(timeout_secs),
            audio_output_dir: env::var("AUDIO_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }

    /// The socket address string this server binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a required variable, recording its name when unset or empty.
fn require_env(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "HF_TOKEN",
            "AUTH_URL",
            "AUTH_ANON_KEY",
            "HOST",
            "PORT",
            "INFERENCE_BASE_URL",
            "CHAT_MODEL",
            "STT_MODEL",
            "TTS_MODEL",
            "UPSTREAM_TIMEOUT_SECS",
            "AUDIO_OUTPUT_DIR",
            "CORS_ALLOWED_ORIGINS",
        ] {
            std::env::remove_var(name);
        }
    }

    fn set_required() {
        std::env::set_var("HF_TOKEN", "test-token");
        std::env::set_var("AUTH_URL", "http://localhost:9999/auth/v1");
        std::env::set_var("AUTH_ANON_KEY", "anon-key");
    }

    #[test]
    #[serial]
    fn test_missing_required_vars_all_reported() {
        clear_env();
        let err = ServerConfig::from_env().unwrap_err();
        match err {
            ConfigError::MissingVars(names) => {
                assert_eq!(names, vec!["HF_TOKEN", "AUTH_URL", "AUTH_ANON_KEY"]);
            }
            _ => panic!("Expected MissingVars error"),
        }
    }

    #[test]
    #[serial]
    fn test_empty_token_counts_as_missing() {
        clear_env();
        set_required();
        std::env::set_var("HF_TOKEN", "   ");
        let err = ServerConfig::from_env().unwrap_err();
        match err {
            ConfigError::MissingVars(names) => assert_eq!(names, vec!["HF_TOKEN"]),
            _ => panic!("Expected MissingVars error"),
        }
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        set_required();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.inference_base_url, DEFAULT_INFERENCE_BASE_URL);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.stt_model, DEFAULT_STT_MODEL);
        assert_eq!(config.tts_model, DEFAULT_TTS_MODEL);
        assert_eq!(
            config.upstream_timeout,
            Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)
        );
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.address(), "127.0.0.1:8000");
    }

    #[test]
    #[serial]
    fn test_trailing_slashes_trimmed() {
        clear_env();
        set_required();
        std::env::set_var("INFERENCE_BASE_URL", "http://localhost:1234///");
        std::env::set_var("AUTH_URL", "http://localhost:9999/auth/v1/");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.inference_base_url, "http://localhost:1234");
        assert_eq!(config.auth_url, "http://localhost:9999/auth/v1");
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        clear_env();
        set_required();
        std::env::set_var("PORT", "not-a-port");
        let err = ServerConfig::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue { name, .. } => assert_eq!(name, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
