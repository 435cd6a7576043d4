//! Subscription intake, backed by the configured store.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use eolwatch_core::error::AppError;
use eolwatch_core::result::AppResult;
use eolwatch_database::SubscriptionStore;
use eolwatch_entity::Schema;
use eolwatch_entity::subscription::{CycleVersion, NewSubscription, Subscription};
use eolwatch_entity::technology::TrackedTechnology;

/// Validates and stores subscriptions; lists what is tracked.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Subscribe to `technology` using the remaining fields from `body`.
    ///
    /// The path segment always wins over a `technology` field in the body.
    pub async fn subscribe(&self, technology: &str, body: Value) -> AppResult<Subscription> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::validation("request body must be a JSON object"));
        };
        fields.insert("technology".to_string(), Value::String(technology.to_string()));

        let new = NewSubscription::parse(Value::Object(fields))?;
        self.create(new).await
    }

    /// Store an already-validated subscription.
    pub async fn create(&self, new: NewSubscription) -> AppResult<Subscription> {
        let subscription = self.store.add_subscription(new).await?;
        info!(
            subscription_id = %subscription.id,
            technology = %subscription.technology,
            version = %subscription.version,
            window_days = subscription.notification_window_days,
            "Subscription created"
        );
        Ok(subscription)
    }

    /// Every distinct tracked pair.
    pub async fn tracked_technologies(&self) -> AppResult<Vec<TrackedTechnology>> {
        self.store.list_tracked_technologies().await
    }

    /// Subscriptions registered against one pair.
    pub async fn subscriptions_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>> {
        self.store.get_subscriptions_for(technology, version).await
    }

    /// Whether the store answers.
    pub async fn store_healthy(&self) -> bool {
        matches!(self.store.health_check().await, Ok(true))
    }
}
