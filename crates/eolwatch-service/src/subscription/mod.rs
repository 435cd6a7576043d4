//! Subscription intake and lookup.

pub mod service;

pub use service::SubscriptionService;
