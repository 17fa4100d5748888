//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL could not be parsed
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server refused the handshake (bad room or user parameter)
    #[error("Server rejected the connection with HTTP status {0}")]
    Rejected(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
