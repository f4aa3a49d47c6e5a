//! Text-generation client for the hosted inference API.

mod client;
mod messages;

pub use client::{Completion, InferenceClient};
pub use messages::GeneratedText;
