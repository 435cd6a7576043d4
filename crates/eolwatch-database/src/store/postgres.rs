//! PostgreSQL-backed subscription store.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use eolwatch_core::result::AppResult;
use eolwatch_core::types::SubscriptionId;
use eolwatch_entity::subscription::{CycleVersion, NewSubscription, Subscription};
use eolwatch_entity::technology::{TechnologyKey, TrackedTechnology};

use super::{AddOutcome, SubscriptionStore};
use crate::connection::DatabasePool;
use crate::repositories::{SubscriptionRepository, TechnologyRepository};

/// Subscription store over the `subscriptions` and `technologies` tables.
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: DatabasePool,
    subscriptions: SubscriptionRepository,
    technologies: TechnologyRepository,
}

impl PgSubscriptionStore {
    /// Create a store on an open pool.
    pub fn new(pool: DatabasePool) -> Self {
        let subscriptions = SubscriptionRepository::new(pool.pool().clone());
        let technologies = TechnologyRepository::new(pool.pool().clone());
        Self {
            pool,
            subscriptions,
            technologies,
        }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn add_subscription(&self, new: NewSubscription) -> AppResult<Subscription> {
        let subscription = Subscription::from_new(SubscriptionId::new(), new, Utc::now());
        self.subscriptions.create(&subscription).await?;

        let key = TechnologyKey::new(subscription.technology.clone(), subscription.version.clone());
        let outcome = self.register_subscriber(&key, subscription.id).await?;
        info!(
            subscription_id = %subscription.id,
            technology = %key.technology,
            version = %key.version,
            index = %outcome,
            "Subscription stored"
        );
        Ok(subscription)
    }

    async fn register_subscriber(
        &self,
        key: &TechnologyKey,
        id: SubscriptionId,
    ) -> AppResult<AddOutcome> {
        let outcome = self
            .technologies
            .register_subscriber(key, id, Utc::now())
            .await?;
        if outcome == AddOutcome::AlreadyPresent {
            debug!(subscription_id = %id, pair = %key, "Subscriber already registered");
        }
        Ok(outcome)
    }

    async fn list_tracked_technologies(&self) -> AppResult<Vec<TrackedTechnology>> {
        self.technologies.list_all().await
    }

    async fn get_subscriptions_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>> {
        self.subscriptions.find_indexed_for(technology, version).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.pool.health_check().await
    }
}
