//! Tracked technology entries.

pub mod model;

pub use model::{TechnologyKey, TrackedTechnology};
