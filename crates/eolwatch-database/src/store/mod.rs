//! The subscription store abstraction and its provider dispatch.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use eolwatch_core::config::{DatabaseConfig, StoreProvider};
use eolwatch_core::result::AppResult;
use eolwatch_core::types::SubscriptionId;
use eolwatch_entity::subscription::{CycleVersion, NewSubscription, Subscription};
use eolwatch_entity::technology::{TechnologyKey, TrackedTechnology};

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

pub use memory::MemorySubscriptionStore;
pub use postgres::PgSubscriptionStore;

/// What registering a subscriber did to the pair's index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// First subscriber for the pair; the entry was created.
    Created,
    /// Entry existed and the id was appended.
    Appended,
    /// The id was already registered; nothing changed.
    AlreadyPresent,
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Appended => write!(f, "appended"),
            Self::AlreadyPresent => write!(f, "already_present"),
        }
    }
}

/// Persistence for subscriptions and the `(technology, version)` index.
///
/// Every call reads or writes the backing store directly; nothing is
/// cached between scan cycles.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + fmt::Debug {
    /// Persist a new subscription and register it under its pair.
    async fn add_subscription(&self, new: NewSubscription) -> AppResult<Subscription>;

    /// Add `id` to the subscriber set of `key`, creating the entry if needed.
    ///
    /// Re-registering an id already in the set is a no-op.
    async fn register_subscriber(
        &self,
        key: &TechnologyKey,
        id: SubscriptionId,
    ) -> AppResult<AddOutcome>;

    /// One entry per distinct tracked pair.
    async fn list_tracked_technologies(&self) -> AppResult<Vec<TrackedTechnology>>;

    /// Materialized subscriptions registered against a pair.
    ///
    /// An unknown pair and a pair with no resolvable subscribers both yield
    /// an empty list.
    async fn get_subscriptions_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Store handle that wraps the configured provider.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn SubscriptionStore>,
}

impl StoreManager {
    /// Build the provider selected by `config.provider`.
    ///
    /// For PostgreSQL this connects the pool and, when enabled, applies
    /// pending migrations.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let inner: Arc<dyn SubscriptionStore> = match config.provider {
            StoreProvider::Postgres => {
                info!("Initializing PostgreSQL subscription store");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Arc::new(PgSubscriptionStore::new(pool))
            }
            StoreProvider::Memory => {
                info!("Initializing in-memory subscription store; contents are lost on restart");
                Arc::new(MemorySubscriptionStore::new())
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<dyn SubscriptionStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl SubscriptionStore for StoreManager {
    async fn add_subscription(&self, new: NewSubscription) -> AppResult<Subscription> {
        self.inner.add_subscription(new).await
    }

    async fn register_subscriber(
        &self,
        key: &TechnologyKey,
        id: SubscriptionId,
    ) -> AppResult<AddOutcome> {
        self.inner.register_subscriber(key, id).await
    }

    async fn list_tracked_technologies(&self) -> AppResult<Vec<TrackedTechnology>> {
        self.inner.list_tracked_technologies().await
    }

    async fn get_subscriptions_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>> {
        self.inner.get_subscriptions_for(technology, version).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
