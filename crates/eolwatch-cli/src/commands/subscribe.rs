//! Subscription creation from the command line.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use eolwatch_core::config::AppConfig;
use eolwatch_core::error::AppError;
use eolwatch_entity::subscription::Subscription;
use eolwatch_service::SubscriptionService;

use crate::output::{self, OutputFormat};

/// Arguments for the subscribe command
#[derive(Debug, Args)]
pub struct SubscribeArgs {
    /// Product name, e.g. `nodejs`
    pub technology: String,

    /// Release cycle, e.g. `20` or `3.11`
    #[arg(long)]
    pub version: String,

    /// Notify once this many days or fewer remain
    #[arg(long, default_value_t = 30)]
    pub window: i32,

    /// Webhook target
    #[arg(long)]
    pub url: String,

    /// Secret sent back as a bearer token
    #[arg(long, env = "EOLWATCH_SUBSCRIPTION_SECRET", hide_env_values = true)]
    pub secret: String,
}

#[derive(Debug, Serialize, Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Technology")]
    technology: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Window (days)")]
    notification_window_days: i32,
    #[tabled(rename = "Webhook")]
    webhook_url: String,
    #[tabled(rename = "Created")]
    created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionRow {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id.to_string(),
            technology: s.technology,
            version: s.version.to_string(),
            notification_window_days: s.notification_window_days,
            webhook_url: s.webhook_url,
            created_at: s.created_at,
        }
    }
}

/// Execute the subscribe command
pub async fn execute(
    args: &SubscribeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let service = SubscriptionService::new(store.store());

    let body = json!({
        "version": args.version,
        "notification_window_days": args.window,
        "webhook_url": args.url,
        "webhook_secret": args.secret,
    });
    let subscription = service.subscribe(&args.technology, body).await?;

    if format == OutputFormat::Table {
        output::print_success(&format!(
            "Subscribed to {} {}",
            subscription.technology, subscription.version
        ));
    }
    output::print_item(&SubscriptionRow::from(subscription), format);
    Ok(())
}
