//! Connection adapters implementing the domain's `MessageSink` / `MessageSource`.
//!
//! - `websocket`: axum WebSocket

pub mod websocket;

pub use websocket::{WebSocketSink, WebSocketSource, split_socket};
