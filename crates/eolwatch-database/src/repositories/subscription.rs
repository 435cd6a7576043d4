//! Subscription repository implementation.

use sqlx::PgPool;

use eolwatch_core::error::{AppError, ErrorKind};
use eolwatch_core::result::AppResult;
use eolwatch_entity::subscription::{CycleVersion, Subscription};

/// Repository for the `subscriptions` table.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a subscription record.
    pub async fn create(&self, subscription: &Subscription) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO subscriptions \
                (id, technology, version, notification_window_days, webhook_url, webhook_secret, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(subscription.id)
        .bind(&subscription.technology)
        .bind(&subscription.version)
        .bind(subscription.notification_window_days)
        .bind(&subscription.webhook_url)
        .bind(&subscription.webhook_secret)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create subscription", e))?;
        Ok(())
    }

    /// Subscriptions referenced by the index entry of one pair, oldest first.
    ///
    /// Ids in the index without a matching record are dropped.
    pub async fn find_indexed_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT s.* FROM technologies t \
             JOIN subscriptions s ON s.id = ANY(t.subscription_ids) \
             WHERE t.technology = $1 AND t.version = $2 \
             ORDER BY s.created_at, s.id",
        )
        .bind(technology)
        .bind(version)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load subscriptions for pair", e)
        })
    }
}
