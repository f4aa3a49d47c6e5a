//! Shared application state.

use std::sync::Arc;

use crate::auth::AuthClient;
use crate::config::ServerConfig;
use crate::core::inference::InferenceClient;
use crate::core::speech::SpeechClient;

/// State shared by every handler: the read-only configuration and one pooled
/// client per upstream concern. Constructed once at boot and injected; no
/// handler reads configuration from ambient process state.
pub struct AppState {
    pub config: ServerConfig,
    pub inference: Arc<InferenceClient>,
    pub speech: Arc<SpeechClient>,
    pub auth: AuthClient,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let inference = Arc::new(InferenceClient::new(
            config.inference_base_url.clone(),
            config.inference_token.clone(),
            config.chat_model.clone(),
            config.upstream_timeout,
        ));
        let speech = Arc::new(SpeechClient::new(
            config.inference_base_url.clone(),
            config.inference_token.clone(),
            config.stt_model.clone(),
            config.tts_model.clone(),
            config.upstream_timeout,
        ));
        let auth = AuthClient::new(
            config.auth_url.clone(),
            config.auth_anon_key.clone(),
            config.upstream_timeout,
        );

        Arc::new(Self {
            config,
            inference,
            speech,
            auth,
        })
    }
}
