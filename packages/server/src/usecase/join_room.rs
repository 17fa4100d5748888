//! UseCase: ルームへの参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRequest::new() のパラメータ検証
//! - JoinRoomUseCase::execute() によるレジストリ経由の参加
//!
//! ### どのような状況を想定しているか
//! - 正常系：room / user が揃っている
//! - 異常系：いずれかが欠けている、または空文字列

use std::sync::Arc;

use crate::domain::{Member, MemberId, MessageSink, MessageSource, Registry};

use super::error::JoinError;

/// Validated join parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    room: String,
    user: String,
}

impl JoinRequest {
    /// Validate raw query parameters. Absent and empty values are both rejected.
    pub fn new(room: Option<String>, user: Option<String>) -> Result<Self, JoinError> {
        let room = room
            .filter(|room| !room.is_empty())
            .ok_or(JoinError::MissingParameter("room"))?;
        let user = user
            .filter(|user| !user.is_empty())
            .ok_or(JoinError::MissingParameter("user"))?;
        Ok(Self { room, user })
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<Registry>,
}

impl JoinRoomUseCase {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Turn an upgraded connection into a member of the requested room.
    ///
    /// # Returns
    ///
    /// * `Ok(MemberId)` - the member was handed to the room; its ingress loop is running
    /// * `Err(JoinError)` - the room could not accept the member
    pub async fn execute(
        &self,
        request: JoinRequest,
        sink: Box<dyn MessageSink>,
        source: Box<dyn MessageSource>,
    ) -> Result<MemberId, JoinError> {
        let member = Member::new(request.user, sink, source);
        let member_id = member.id();

        let room = self.registry.join(&request.room, member).await?;
        tracing::info!(room = %room.name(), %member_id, "Member handed to room");

        Ok(member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        RoomConfig,
        testing::{channel_sink, scripted_source, wait_for_member_count},
    };

    #[test]
    fn test_join_request_valid() {
        // テスト項目: room と user が揃っていればリクエストが作成される
        // given (前提条件):
        let room = Some("lobby".to_string());
        let user = Some("alice".to_string());

        // when (操作):
        let request = JoinRequest::new(room, user).unwrap();

        // then (期待する結果):
        assert_eq!(request.room(), "lobby");
        assert_eq!(request.user(), "alice");
    }

    #[test]
    fn test_join_request_missing_user() {
        // テスト項目: user が無い場合は MissingParameter("user") になる
        // given (前提条件):
        let room = Some("lobby".to_string());

        // when (操作):
        let result = JoinRequest::new(room, None);

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::MissingParameter("user")));
    }

    #[test]
    fn test_join_request_empty_room() {
        // テスト項目: room が空文字列の場合は MissingParameter("room") になる
        // given (前提条件):
        let room = Some(String::new());
        let user = Some("alice".to_string());

        // when (操作):
        let result = JoinRequest::new(room, user);

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::MissingParameter("room")));
    }

    #[tokio::test]
    async fn test_execute_joins_member_to_room() {
        // テスト項目: execute でメンバーが指定ルームに参加する
        // given (前提条件):
        let registry = Arc::new(Registry::new(RoomConfig::default()));
        let usecase = JoinRoomUseCase::new(registry.clone());
        let request =
            JoinRequest::new(Some("lobby".to_string()), Some("alice".to_string())).unwrap();
        let (sink, _inbox) = channel_sink();
        let (source, _outbox) = scripted_source();

        // when (操作):
        let member_id = usecase.execute(request, sink, source).await.unwrap();

        // then (期待する結果):
        let room = registry.room("lobby").await.unwrap();
        wait_for_member_count(&room, 1).await;
        let members = room.members().await.unwrap();
        assert_eq!(members[0].id, member_id);
        assert_eq!(members[0].name, "alice");
    }
}
