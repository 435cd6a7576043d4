//! Outbound HTTP collaborator configuration.

use serde::{Deserialize, Serialize};

/// EOL data authority (endoflife.date compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndOfLifeConfig {
    /// API base, without trailing slash.
    #[serde(default = "default_endoflife_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EndOfLifeConfig {
    fn default() -> Self {
        Self {
            base_url: default_endoflife_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Subscriber webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// `User-Agent` sent with every delivery.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Operator chat channel (Telegram Bot API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Whether chat pushes are sent.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Bot API base.
    #[serde(default = "default_telegram_url")]
    pub base_url: String,
    /// Bot token.
    #[serde(default)]
    pub bot_token: String,
    /// Target chat: numeric id or `@channel` handle.
    #[serde(default)]
    pub chat_id: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_telegram_url(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl TelegramConfig {
    /// Whether `chat_id` looks like something the Bot API accepts.
    pub fn chat_id_is_valid(&self) -> bool {
        let id = self.chat_id.trim();
        if let Some(handle) = id.strip_prefix('@') {
            return !handle.is_empty()
                && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        }
        id.parse::<i64>().is_ok()
    }
}

/// Inbound authorization secrets.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityConfig {
    /// Process-wide secret presented by callers of the callback endpoint.
    #[serde(default)]
    pub webhook_secret: String,
}

fn default_endoflife_url() -> String {
    "https://endoflife.date/api".to_string()
}

fn default_telegram_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_user_agent() -> String {
    "eol-notify".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
