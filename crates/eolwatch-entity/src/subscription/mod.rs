//! Subscription domain entities.

pub mod model;
pub mod version;

pub use model::{MAX_WINDOW_DAYS, MIN_WINDOW_DAYS, NewSubscription, Subscription};
pub use version::CycleVersion;
