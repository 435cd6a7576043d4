//! Tracked technology entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eolwatch_core::types::{SubscriptionId, TechnologyId};

use crate::subscription::CycleVersion;

/// The `(technology, version)` pair a subscription targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TechnologyKey {
    /// Product name.
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
}

impl TechnologyKey {
    /// Build a key.
    pub fn new(technology: impl Into<String>, version: CycleVersion) -> Self {
        Self {
            technology: technology.into(),
            version,
        }
    }
}

impl fmt::Display for TechnologyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.technology, self.version)
    }
}

/// Aggregate of subscription ids registered against one pair.
///
/// Created lazily on the first subscription for a pair and only ever grows.
/// `subscription_ids` never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TrackedTechnology {
    /// Entry identifier.
    pub id: TechnologyId,
    /// Product name.
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
    /// Registered subscribers, in arrival order.
    pub subscription_ids: Vec<SubscriptionId>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When a subscriber was last appended.
    pub updated_at: DateTime<Utc>,
}

impl TrackedTechnology {
    /// A fresh entry holding a single subscriber.
    pub fn with_first_subscriber(key: TechnologyKey, id: SubscriptionId, now: DateTime<Utc>) -> Self {
        Self {
            id: TechnologyId::new(),
            technology: key.technology,
            version: key.version,
            subscription_ids: vec![id],
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `id` is already registered.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscription_ids.contains(&id)
    }

    /// Append `id` unless present. Returns `true` when the set grew.
    pub fn merge_subscriber(&mut self, id: SubscriptionId, now: DateTime<Utc>) -> bool {
        if self.contains(id) {
            return false;
        }
        self.subscription_ids.push(id);
        self.updated_at = now;
        true
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscription_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_idempotent() {
        let now = Utc::now();
        let first = SubscriptionId::new();
        let mut entry = TrackedTechnology::with_first_subscriber(
            TechnologyKey::new("node", CycleVersion::from(20)),
            first,
            now,
        );

        let second = SubscriptionId::new();
        assert!(entry.merge_subscriber(second, now));
        assert!(!entry.merge_subscriber(second, now));
        assert!(!entry.merge_subscriber(first, now));
        assert_eq!(entry.subscription_ids, vec![first, second]);
    }

    #[test]
    fn test_key_display() {
        let key = TechnologyKey::new("python", CycleVersion::parse("3.12").unwrap());
        assert_eq!(key.to_string(), "python 3.12");
    }
}
