//! Delivery of EOL notices to subscriber webhooks.

use std::fmt;

use async_trait::async_trait;
use tracing::{info, warn};

use eolwatch_core::config::WebhookConfig;
use eolwatch_core::result::AppResult;
use eolwatch_entity::eol::EolNotice;
use eolwatch_entity::subscription::Subscription;

use crate::http::{build_client, truncate_body};

/// Longest response body kept on a failed delivery.
const MAX_FAILURE_BODY: usize = 512;

/// Outcome of one delivery attempt. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The target answered 2xx.
    Succeeded {
        /// Response status.
        status: u16,
    },
    /// The target answered with a non-success status.
    Failed {
        /// Response status.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// No response: connect error, timeout, or a bad target URL.
    Unreachable {
        /// Client-side reason.
        reason: String,
    },
}

impl DeliveryResult {
    /// Whether the target acknowledged the notice.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl fmt::Display for DeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded { status } => write!(f, "delivered ({status})"),
            Self::Failed { status, .. } => write!(f, "rejected ({status})"),
            Self::Unreachable { reason } => write!(f, "unreachable ({reason})"),
        }
    }
}

/// Pushes a notice to one subscriber.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `notice` to `subscription`'s webhook. Exactly one attempt.
    async fn notify(&self, subscription: &Subscription, notice: &EolNotice) -> DeliveryResult;
}

/// Authenticated JSON POST to `subscription.webhook_url`.
///
/// The subscription secret is sent as `Authorization: Bearer <secret>`.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Build a dispatcher from configuration.
    pub fn new(config: &WebhookConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout_seconds)?,
        })
    }
}

#[async_trait]
impl Notifier for WebhookDispatcher {
    async fn notify(&self, subscription: &Subscription, notice: &EolNotice) -> DeliveryResult {
        let sent = self
            .client
            .post(&subscription.webhook_url)
            .bearer_auth(&subscription.webhook_secret)
            .json(notice)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let reason = e.without_url().to_string();
                warn!(
                    subscription_id = %subscription.id,
                    reason = %reason,
                    "Webhook unreachable"
                );
                return DeliveryResult::Unreachable { reason };
            }
        };

        let status = response.status().as_u16();
        if response.status().is_success() {
            info!(subscription_id = %subscription.id, status, "Webhook delivered");
            return DeliveryResult::Succeeded { status };
        }

        let body = response.text().await.unwrap_or_default();
        let body = truncate_body(&body, MAX_FAILURE_BODY);
        warn!(
            subscription_id = %subscription.id,
            status,
            body = %body,
            "Webhook rejected notice"
        );
        DeliveryResult::Failed { status, body }
    }
}
