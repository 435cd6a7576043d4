//! Authenticated callback that pushes a notice to the operator chat.

pub mod service;

pub use service::{CallbackOutcome, CallbackService};
