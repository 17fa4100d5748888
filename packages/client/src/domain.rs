//! Reconnection decisions.
//!
//! Pure functions so the runner's retry policy can be tested without a server.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A rejected handshake or a malformed URL fails the same way on every attempt.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_) | ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Consecutive failed connection attempts.
///
/// Only failures since the last successful handshake count towards the limit.
#[derive(Debug)]
pub struct ReconnectAttempts {
    failed: u32,
    max: u32,
}

impl ReconnectAttempts {
    pub fn new(max: u32) -> Self {
        Self { failed: 0, max }
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// A handshake succeeded.
    pub fn connected(&mut self) {
        self.failed = 0;
    }

    /// Count a failure and decide whether to try again.
    pub fn record_failure(&mut self, error: &ClientError) -> bool {
        self.failed += 1;
        should_attempt_reconnect(error, self.failed, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_when_rejected() {
        // テスト項目: ハンドシェイクが拒否された場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Rejected(400);

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_when_rejected() {
        // テスト項目: 拒否された場合、試行回数に関係なく再接続しない
        // given (前提条件):
        let error = ClientError::Rejected(400);

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_exit_immediately_with_invalid_url() {
        // テスト項目: URL が不正な場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::from(url::Url::parse("not a url").unwrap_err());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_attempts_give_up_at_limit() {
        // テスト項目: 接続に成功しないまま上限回数失敗すると再接続を諦める
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());
        let mut attempts = ReconnectAttempts::new(5);

        // when (操作):
        let decisions: Vec<bool> = (0..5).map(|_| attempts.record_failure(&error)).collect();

        // then (期待する結果):
        assert_eq!(decisions, vec![true, true, true, true, false]);
        assert_eq!(attempts.failed(), 5);
    }

    #[test]
    fn test_successful_handshake_resets_attempts() {
        // テスト項目: 接続に成功すると失敗回数がリセットされ、以後の切断でも再接続できる
        // given (前提条件):
        let error = ClientError::ConnectionError("connection lost".to_string());
        let mut attempts = ReconnectAttempts::new(5);
        for _ in 0..4 {
            assert!(attempts.record_failure(&error));
        }

        // when (操作):
        attempts.connected();
        let retry = attempts.record_failure(&error);

        // then (期待する結果):
        assert!(retry);
        assert_eq!(attempts.failed(), 1);
    }

    #[test]
    fn test_rejection_is_never_retried() {
        // テスト項目: 拒否された場合は失敗回数に関係なく再接続しない
        // given (前提条件):
        let mut attempts = ReconnectAttempts::new(5);

        // when (操作):
        let retry = attempts.record_failure(&ClientError::Rejected(400));

        // then (期待する結果):
        assert!(!retry);
    }
}
