//! Text chat WebSocket endpoint.

mod handler;
pub mod messages;

pub use handler::chat_handler;
