//! UseCase layer.

mod error;
mod join_room;

pub use error::JoinError;
pub use join_room::{JoinRequest, JoinRoomUseCase};
