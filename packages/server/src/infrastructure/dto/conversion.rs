//! Conversion between wire DTOs and domain values, plus the JSON codec.

use crate::domain::{ChatMessage, MemberError};

use super::websocket::ChatMessageDto;

// ========================================
// DTO → Domain
// ========================================

impl From<ChatMessageDto> for ChatMessage {
    fn from(dto: ChatMessageDto) -> Self {
        ChatMessage::new(dto.user, dto.text)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            user: model.sender().to_string(),
            text: model.text().to_string(),
        }
    }
}

/// Serialize a chat message to its JSON wire form.
pub fn encode_chat_message(message: &ChatMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ChatMessageDto::from(message))
}

/// Parse a JSON payload into a chat message.
pub fn decode_chat_message(payload: &[u8]) -> Result<ChatMessage, MemberError> {
    serde_json::from_slice::<ChatMessageDto>(payload)
        .map(ChatMessage::from)
        .map_err(|e| MemberError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_user_and_text_fields() {
        // テスト項目: エンコード結果は user / text フィールドを持つ JSON オブジェクトになる
        // given (前提条件):
        let message = ChatMessage::new("Alice", "hi");

        // when (操作):
        let json = encode_chat_message(&message).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"user": "Alice", "text": "hi"}));
    }

    #[test]
    fn test_decode_full_payload() {
        // テスト項目: user と text を持つペイロードがデコードされる
        // given (前提条件):
        let payload = br#"{"user":"Bob","text":"hello"}"#;

        // when (操作):
        let message = decode_chat_message(payload).unwrap();

        // then (期待する結果):
        assert_eq!(message, ChatMessage::new("Bob", "hello"));
    }

    #[test]
    fn test_decode_without_user() {
        // テスト項目: user が省略されていてもデコードできる（送信者名はサーバー側で付与）
        // given (前提条件):
        let payload = br#"{"text":"hello"}"#;

        // when (操作):
        let message = decode_chat_message(payload).unwrap();

        // then (期待する結果):
        assert_eq!(message.text(), "hello");
        assert_eq!(message.sender(), "");
    }

    #[test]
    fn test_decode_without_text_is_malformed() {
        // テスト項目: text が無いペイロードは Malformed エラーになる
        // given (前提条件):
        let payload = br#"{"user":"Bob"}"#;

        // when (操作):
        let result = decode_chat_message(payload);

        // then (期待する結果):
        assert!(matches!(result, Err(MemberError::Malformed(_))));
    }

    #[test]
    fn test_decode_non_json_is_malformed() {
        // テスト項目: JSON ではないテキストは Malformed エラーになる
        // given (前提条件):
        let payload = b"just some text";

        // when (操作):
        let result = decode_chat_message(payload);

        // then (期待する結果):
        assert!(matches!(result, Err(MemberError::Malformed(_))));
    }
}
