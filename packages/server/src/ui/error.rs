//! Server error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
