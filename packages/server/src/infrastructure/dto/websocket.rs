//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Chat message as it appears on the wire: `{"user": "...", "text": "..."}`.
///
/// Inbound `user` may be omitted; the server always stamps the member's own
/// display name before broadcasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    #[serde(default)]
    pub user: String,
    pub text: String,
}
