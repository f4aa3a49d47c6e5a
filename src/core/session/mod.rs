//! Per-connection session pipeline.

mod pipeline;

pub use pipeline::{SessionError, SessionPipeline, VoiceTurn};
