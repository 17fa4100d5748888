//! Message formatting utilities for client display.

use chrono::{DateTime, TimeZone};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message as `[HH:MM:SS] user: text`, stamped with the local receive time
    pub fn format_chat_message<Tz>(user: &str, text: &str, received_at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!("[{}] {}: {}", received_at.format("%H:%M:%S"), user, text)
    }

    /// Format a frame that could not be parsed as a chat message
    pub fn format_raw_message(text: &str) -> String {
        format!("<- {}", text)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが "[HH:MM:SS] user: text" 形式になる
        // given (前提条件):
        let received_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 5, 7).unwrap();

        // when (操作):
        let result = MessageFormatter::format_chat_message("alice", "hi", &received_at);

        // then (期待する結果):
        assert_eq!(result, "[09:05:07] alice: hi");
    }

    #[test]
    fn test_format_chat_message_uses_given_offset() {
        // テスト項目: 受信時刻はタイムゾーンのローカル時刻で表示される
        // given (前提条件):
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let received_at = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .with_timezone(&jst);

        // when (操作):
        let result = MessageFormatter::format_chat_message("bob", "good morning", &received_at);

        // then (期待する結果):
        assert_eq!(result, "[09:00:00] bob: good morning");
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 解析できないフレームはそのまま表示される
        // given (前提条件):
        let text = "not json";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert_eq!(result, "<- not json");
    }
}
