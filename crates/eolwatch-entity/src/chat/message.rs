//! Message object echoed back by the chat API after a send.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::{Schema, SchemaError};

/// Longest text the chat API accepts in one message.
pub const MAX_TEXT_LEN: u64 = 4096;

/// Chat the message landed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInfo {
    /// Chat identifier.
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Public handle, if any.
    #[serde(default)]
    pub username: Option<String>,
    /// Group or channel title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Bot that sent the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSender {
    /// Sender identifier.
    pub id: i64,
    /// Always `true` for our own sends.
    pub is_bot: bool,
    /// Display name.
    pub first_name: String,
    /// Handle.
    #[serde(default)]
    pub username: Option<String>,
}

/// A delivered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChatMessage {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// Rendered text.
    #[validate(length(min = 1, max = MAX_TEXT_LEN))]
    pub text: String,
    /// Unix timestamp of the send.
    pub date: i64,
    /// Destination chat.
    pub chat: ChatInfo,
    /// Sending bot; absent for anonymous channel posts.
    #[serde(default)]
    pub from: Option<ChatSender>,
}

impl Schema for ChatMessage {
    fn check(&self) -> Result<(), SchemaError> {
        self.validate()?;
        if self.date <= 0 {
            return Err(SchemaError::Constraint("date must be a unix timestamp".into()));
        }
        Ok(())
    }
}
