//! Server state shared with every handler.

use std::sync::Arc;

use crate::usecase::JoinRoomUseCase;

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
}
