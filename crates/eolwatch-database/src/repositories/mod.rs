//! PostgreSQL repositories backing the subscription store.

pub mod subscription;
pub mod technology;

pub use subscription::SubscriptionRepository;
pub use technology::TechnologyRepository;
