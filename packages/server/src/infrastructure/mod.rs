//! Infrastructure layer: the WebSocket transport behind the domain's connection traits.

pub mod connection;
pub mod dto;
