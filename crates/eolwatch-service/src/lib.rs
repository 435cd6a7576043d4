//! # eolwatch-service
//!
//! Use cases driven by inbound requests. Services receive their store and
//! clients through constructors as `Arc` handles; none of them reads
//! configuration or the environment on its own.

pub mod callback;
pub mod secret;
pub mod subscription;

pub use callback::{CallbackOutcome, CallbackService};
pub use subscription::SubscriptionService;
