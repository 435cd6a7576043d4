//! Callback authorization and chat push.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use eolwatch_core::error::AppError;
use eolwatch_core::result::AppResult;
use eolwatch_entity::Schema;
use eolwatch_entity::subscription::NewSubscription;
use eolwatch_integration::ChatChannel;
use eolwatch_integration::telegram::escape_markdown;

use crate::secret::secrets_match;

/// Result of an accepted callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackOutcome {
    /// The composed notice.
    pub message: String,
    /// Whether the chat channel accepted the push.
    pub chat_delivered: bool,
}

/// Checks a subscription-shaped payload against the process secret and, on
/// success, tells the operator chat about it.
#[derive(Clone)]
pub struct CallbackService {
    process_secret: Arc<str>,
    chat: Option<Arc<dyn ChatChannel>>,
}

impl std::fmt::Debug for CallbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackService")
            .field("chat_enabled", &self.chat.is_some())
            .finish_non_exhaustive()
    }
}

impl CallbackService {
    /// `chat` is `None` when the chat channel is disabled.
    pub fn new(process_secret: impl Into<Arc<str>>, chat: Option<Arc<dyn ChatChannel>>) -> Self {
        Self {
            process_secret: process_secret.into(),
            chat,
        }
    }

    /// Validate, authorize, compose and push.
    ///
    /// Schema failures are validation errors and a secret mismatch is
    /// unauthorized; neither reaches the chat channel. A failed push is
    /// logged and reported in the outcome.
    pub async fn handle(&self, body: Value) -> AppResult<CallbackOutcome> {
        let payload = NewSubscription::parse(body)?;

        if !secrets_match(&payload.webhook_secret, &self.process_secret) {
            warn!(technology = %payload.technology, "Callback rejected: webhook secret mismatch");
            return Err(AppError::unauthorized("webhook secret does not match"));
        }

        let message = format!("Package {} {} is EOL", payload.technology, payload.version);
        let chat_delivered = match &self.chat {
            Some(chat) => {
                let text = format!(
                    "Package *{}* {} is EOL",
                    escape_markdown(&payload.technology),
                    payload.version
                );
                match chat.send_message(&text).await {
                    Ok(sent) => {
                        info!(message_id = sent.message_id, "Callback pushed to chat");
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Callback chat push failed");
                        false
                    }
                }
            }
            None => false,
        };

        Ok(CallbackOutcome {
            message,
            chat_delivered,
        })
    }
}
