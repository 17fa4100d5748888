//! UseCase error types.

use thiserror::Error;

use crate::domain::RoomError;

/// Errors from the join path
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum JoinError {
    /// A required query parameter is absent or empty
    #[error("missing or empty parameter: {0}")]
    MissingParameter(&'static str),

    /// The room refused the member
    #[error(transparent)]
    Room(#[from] RoomError),
}
