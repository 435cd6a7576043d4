//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use eolwatch_core::config::AppConfig;
use eolwatch_service::{CallbackService, SubscriptionService};

/// Passed to every handler via `State<AppState>`; clones share the same
/// `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Subscription intake and listing
    pub subscription_service: Arc<SubscriptionService>,
    /// Callback authorization and chat push
    pub callback_service: Arc<CallbackService>,
}
