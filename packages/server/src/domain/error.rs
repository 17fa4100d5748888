//! Domain error types.

use thiserror::Error;

/// Failure of a single member's connection.
///
/// Every variant is terminal for the member: the room removes it and its
/// ingress loop stops. Nothing is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemberError {
    /// The peer closed the connection (or it was already gone)
    #[error("connection closed")]
    Closed,

    /// Read or write on the transport failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer sent a payload that is not a chat message
    #[error("malformed message: {0}")]
    Malformed(String),
}

/// Errors returned by a [`Room`](super::Room) handle.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RoomError {
    /// The room's broadcast loop has stopped
    #[error("room is closed")]
    Closed,

    /// The message queue stayed full for the whole enqueue timeout
    #[error("room message queue is full")]
    QueueFull,
}
