//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eolwatch_core::types::{SubscriptionId, TechnologyId};
use eolwatch_entity::subscription::{CycleVersion, Subscription};
use eolwatch_entity::technology::TrackedTechnology;
use eolwatch_service::CallbackOutcome;

/// `GET /` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// What the service does.
    pub description: String,
    /// Running version.
    pub version: String,
    /// Example subscribe request.
    pub example: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Store reachability.
    pub store: String,
    /// Running version.
    pub version: String,
}

/// A stored subscription as returned to its creator. The secret is not echoed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Store-assigned id.
    pub id: SubscriptionId,
    /// Product name.
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
    /// Window in days.
    pub notification_window_days: i32,
    /// Delivery target.
    pub webhook_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            technology: s.technology,
            version: s.version,
            notification_window_days: s.notification_window_days,
            webhook_url: s.webhook_url,
            created_at: s.created_at,
        }
    }
}

/// One tracked pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyResponse {
    /// Entry id.
    pub id: TechnologyId,
    /// Product name.
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
    /// Registered subscribers.
    pub subscribers: usize,
    /// When the pair was first subscribed.
    pub created_at: DateTime<Utc>,
}

impl From<TrackedTechnology> for TechnologyResponse {
    fn from(t: TrackedTechnology) -> Self {
        Self {
            subscribers: t.subscriber_count(),
            id: t.id,
            technology: t.technology,
            version: t.version,
            created_at: t.created_at,
        }
    }
}

/// `POST /callback` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResponse {
    /// Composed notice.
    pub message: String,
    /// Whether the chat channel took it.
    pub chat_delivered: bool,
}

impl From<CallbackOutcome> for CallbackResponse {
    fn from(o: CallbackOutcome) -> Self {
        Self {
            message: o.message,
            chat_delivered: o.chat_delivered,
        }
    }
}
