//! Chat message value object.

use std::fmt;

/// A chat message as it travels through a room: who sent it and what they said.
///
/// There is no id or timestamp; the only ordering is arrival order into the
/// room's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    sender: String,
    text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Re-attribute the message to `sender`, keeping the text.
    pub fn with_sender(self, sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: self.text,
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.text)
    }
}
