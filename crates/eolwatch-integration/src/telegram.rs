//! Telegram Bot API client for the operator chat channel.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use eolwatch_core::config::TelegramConfig;
use eolwatch_core::result::AppResult;
use eolwatch_entity::Schema;
use eolwatch_entity::chat::ChatMessage;
use eolwatch_entity::chat::message::MAX_TEXT_LEN;

use crate::error::IntegrationError;
use crate::http::{build_client, default_user_agent, parse_base_url, truncate_body};

/// Best-effort side channel for human-readable notices.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Send `text` (legacy Markdown) and return the message the API stored.
    async fn send_message(&self, text: &str) -> Result<ChatMessage, IntegrationError>;
}

/// `{ ok, result | description }` envelope wrapping every Bot API reply.
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

/// `POST {base}/bot{token}/sendMessage?chat_id=..&text=..&parse_mode=Markdown`.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Build a client from configuration.
    pub fn new(config: &TelegramConfig) -> AppResult<Self> {
        let base = parse_base_url(&config.base_url)?;
        Ok(Self {
            client: build_client(&default_user_agent(), config.timeout_seconds)?,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                base.as_str().trim_end_matches('/'),
                config.bot_token.trim()
            ),
            chat_id: config.chat_id.trim().to_string(),
        })
    }

    /// The chat channel when `telegram.enabled`, otherwise `None`.
    pub fn from_config(config: &TelegramConfig) -> AppResult<Option<Arc<dyn ChatChannel>>> {
        if !config.enabled {
            return Ok(None);
        }
        let client: Arc<dyn ChatChannel> = Arc::new(Self::new(config)?);
        Ok(Some(client))
    }
}

#[async_trait]
impl ChatChannel for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<ChatMessage, IntegrationError> {
        let text = clamp_text(text);
        if text.trim().is_empty() {
            return Err(IntegrationError::ChatRejected("message text is empty".into()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text.as_str()),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await
            .map_err(|e| IntegrationError::transport("telegram", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IntegrationError::transport("telegram", e))?;

        let reply: BotApiReply = serde_json::from_str(&body).map_err(|_| {
            IntegrationError::ChatRejected(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_body(&body, 200)
            ))
        })?;

        if !reply.ok {
            let reason = reply
                .description
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), reason = %reason, "Chat message refused");
            return Err(IntegrationError::ChatRejected(reason));
        }

        let result = reply
            .result
            .ok_or_else(|| IntegrationError::ChatRejected("reply carried no message".into()))?;
        let message = ChatMessage::parse(result)
            .map_err(|e| IntegrationError::ChatRejected(format!("unexpected message shape: {e}")))?;

        debug!(message_id = message.message_id, chat_id = message.chat.id, "Chat message sent");
        Ok(message)
    }
}

/// Escape legacy-Markdown control characters in user-supplied text.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Cut `text` to the Bot API's per-message limit.
fn clamp_text(text: &str) -> String {
    let limit = MAX_TEXT_LEN as usize;
    match text.char_indices().nth(limit) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
