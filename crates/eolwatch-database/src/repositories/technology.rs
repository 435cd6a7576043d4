//! Tracked technology repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use eolwatch_core::error::{AppError, ErrorKind};
use eolwatch_core::result::AppResult;
use eolwatch_core::types::{SubscriptionId, TechnologyId};
use eolwatch_entity::technology::{TechnologyKey, TrackedTechnology};

use crate::store::AddOutcome;

/// Repository for the `technologies` subscriber index.
#[derive(Debug, Clone)]
pub struct TechnologyRepository {
    pool: PgPool,
}

impl TechnologyRepository {
    /// Create a new technology repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every tracked pair, ordered by name then version.
    pub async fn list_all(&self) -> AppResult<Vec<TrackedTechnology>> {
        sqlx::query_as::<_, TrackedTechnology>(
            "SELECT * FROM technologies ORDER BY technology, version",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list technologies", e))
    }

    /// Add `subscription_id` to the subscriber set of `key`.
    ///
    /// Runs in one transaction: the row is created if missing, then locked
    /// with `FOR UPDATE` before the membership check, so concurrent callers
    /// for the same pair serialize and none of their ids is lost.
    pub async fn register_subscriber(
        &self,
        key: &TechnologyKey,
        subscription_id: SubscriptionId,
        now: DateTime<Utc>,
    ) -> AppResult<AddOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin index transaction"))?;

        let inserted = sqlx::query(
            "INSERT INTO technologies (id, technology, version, subscription_ids, created_at, updated_at) \
             VALUES ($1, $2, $3, '{}', $4, $4) \
             ON CONFLICT (technology, version) DO NOTHING",
        )
        .bind(TechnologyId::new())
        .bind(&key.technology)
        .bind(&key.version)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to create technology entry"))?
        .rows_affected()
            == 1;

        let entry = sqlx::query_as::<_, TrackedTechnology>(
            "SELECT * FROM technologies WHERE technology = $1 AND version = $2 FOR UPDATE",
        )
        .bind(&key.technology)
        .bind(&key.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to lock technology entry"))?;

        let outcome = if entry.contains(subscription_id) {
            AddOutcome::AlreadyPresent
        } else {
            sqlx::query(
                "UPDATE technologies \
                 SET subscription_ids = array_append(subscription_ids, $2), updated_at = $3 \
                 WHERE id = $1",
            )
            .bind(entry.id)
            .bind(subscription_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to append subscriber"))?;

            if inserted {
                AddOutcome::Created
            } else {
                AddOutcome::Appended
            }
        };

        tx.commit()
            .await
            .map_err(db_err("Failed to commit index transaction"))?;
        Ok(outcome)
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}
