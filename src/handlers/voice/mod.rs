//! Voice chat WebSocket endpoint.

mod handler;
pub mod messages;

pub use handler::voice_handler;
