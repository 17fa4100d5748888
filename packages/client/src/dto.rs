//! Wire format of chat messages exchanged with the server.

use serde::{Deserialize, Serialize};

/// `{"user": "...", "text": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    #[serde(default)]
    pub user: String,
    pub text: String,
}
