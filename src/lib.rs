pub mod auth;
pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use core::inference::{Completion, InferenceClient};
pub use core::session::{SessionPipeline, VoiceTurn};
pub use core::speech::SpeechClient;
pub use errors::UpstreamError;
pub use state::AppState;
