//! # eolwatch-database
//!
//! The subscription store. Subscriptions and the per-pair subscriber index
//! live either in PostgreSQL or in process-local maps; callers only see the
//! [`SubscriptionStore`] trait through [`StoreManager`].

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{AddOutcome, StoreManager, SubscriptionStore};
