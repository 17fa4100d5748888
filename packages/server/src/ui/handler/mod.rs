//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{health_check, home_page};
pub use websocket::websocket_handler;
