//! In-memory subscription store using dashmap.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use eolwatch_core::result::AppResult;
use eolwatch_core::types::SubscriptionId;
use eolwatch_entity::subscription::{CycleVersion, NewSubscription, Subscription};
use eolwatch_entity::technology::{TechnologyKey, TrackedTechnology};

use super::{AddOutcome, SubscriptionStore};

/// Process-local store. Clones share the same maps.
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriptionStore {
    subscriptions: Arc<DashMap<SubscriptionId, Subscription>>,
    technologies: Arc<DashMap<TechnologyKey, TrackedTechnology>>,
}

impl MemorySubscriptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscription records.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn add_subscription(&self, new: NewSubscription) -> AppResult<Subscription> {
        let subscription = Subscription::from_new(SubscriptionId::new(), new, Utc::now());
        self.subscriptions
            .insert(subscription.id, subscription.clone());

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
        // The entry guard holds the shard lock for the whole check-and-append.
        let outcome = match self.technologies.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get_mut().merge_subscriber(id, Utc::now()) {
                    AddOutcome::Appended
                } else {
                    AddOutcome::AlreadyPresent
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(TrackedTechnology::with_first_subscriber(
                    key.clone(),
                    id,
                    Utc::now(),
                ));
                AddOutcome::Created
            }
        };

        if outcome == AddOutcome::AlreadyPresent {
            debug!(subscription_id = %id, pair = %key, "Subscriber already registered");
        }
        Ok(outcome)
    }

    async fn list_tracked_technologies(&self) -> AppResult<Vec<TrackedTechnology>> {
        let mut entries: Vec<TrackedTechnology> = self
            .technologies
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            (&a.technology, &a.version).cmp(&(&b.technology, &b.version))
        });
        Ok(entries)
    }

    async fn get_subscriptions_for(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> AppResult<Vec<Subscription>> {
        let key = TechnologyKey::new(technology, version.clone());
        let ids = match self.technologies.get(&key) {
            Some(entry) => entry.subscription_ids.clone(),
            None => return Ok(Vec::new()),
        };

        Ok(ids
            .iter()
            .filter_map(|id| self.subscriptions.get(id).map(|s| s.value().clone()))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eolwatch_entity::Schema;
    use serde_json::json;

    fn new_subscription(technology: &str, version: u32, window: i32) -> NewSubscription {
        NewSubscription::parse(json!({
            "technology": technology,
            "version": version,
            "notification_window_days": window,
            "webhook_url": "https://example.org/hook",
            "webhook_secret": "s3cr3t"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let store = MemorySubscriptionStore::new();
        let stored = store
            .add_subscription(new_subscription("node", 20, 30))
            .await
            .unwrap();

        let found = store
            .get_subscriptions_for("node", &CycleVersion::from(20))
            .await
            .unwrap();
        assert_eq!(found, vec![stored.clone()]);
        assert_eq!(found[0].webhook_url, "https://example.org/hook");
        assert_eq!(found[0].notification_window_days, 30);
    }

    #[tokio::test]
    async fn test_unknown_pair_is_empty() {
        let store = MemorySubscriptionStore::new();
        let found = store
            .get_subscriptions_for("node", &CycleVersion::from(18))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let store = MemorySubscriptionStore::new();
        let stored = store
            .add_subscription(new_subscription("python", 3, 10))
            .await
            .unwrap();
        let key = TechnologyKey::new("python", CycleVersion::from(3));

        let again = store.register_subscriber(&key, stored.id).await.unwrap();
        assert_eq!(again, AddOutcome::AlreadyPresent);

        let tracked = store.list_tracked_technologies().await.unwrap();
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].subscription_ids, vec![stored.id]);
    }

    #[tokio::test]
    async fn test_outcomes_for_new_and_existing_pairs() {
        let store = MemorySubscriptionStore::new();
        let key = TechnologyKey::new("go", CycleVersion::from(1));
        let first = SubscriptionId::new();
        let second = SubscriptionId::new();

        assert_eq!(
            store.register_subscriber(&key, first).await.unwrap(),
            AddOutcome::Created
        );
        assert_eq!(
            store.register_subscriber(&key, second).await.unwrap(),
            AddOutcome::Appended
        );
    }

    #[tokio::test]
    async fn test_one_entry_per_distinct_pair() {
        let store = MemorySubscriptionStore::new();
        for window in [5, 10, 30] {
            store
                .add_subscription(new_subscription("node", 20, window))
                .await
                .unwrap();
        }
        store
            .add_subscription(new_subscription("node", 18, 30))
            .await
            .unwrap();

        let tracked = store.list_tracked_technologies().await.unwrap();
        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked[0].version, CycleVersion::from(18));
        assert_eq!(tracked[1].subscriber_count(), 3);
        assert_eq!(store.subscription_count(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_lose_nothing() {
        let store = MemorySubscriptionStore::new();
        let tasks = (0..32).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .add_subscription(new_subscription("rust", 1, 30))
                    .await
                    .unwrap()
                    .id
            })
        });
        let ids: Vec<SubscriptionId> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let tracked = store.list_tracked_technologies().await.unwrap();
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].subscriber_count(), 32);
        assert!(ids.iter().all(|id| tracked[0].contains(*id)));
    }
}
