//! Speech-to-text and text-to-speech clients for the hosted inference API.

mod client;
mod messages;

pub use client::{SpeechClient, SpeechError};
pub use messages::TranscriptionResponse;
