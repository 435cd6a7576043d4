//! Tracked technology listing.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use eolwatch_core::config::AppConfig;
use eolwatch_core::error::AppError;
use eolwatch_database::SubscriptionStore;
use eolwatch_entity::technology::TrackedTechnology;

use crate::output::{self, OutputFormat};

/// Arguments for the technologies command
#[derive(Debug, Args)]
pub struct TechnologiesArgs {
    /// Only show this technology
    #[arg(short, long)]
    pub technology: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct TechnologyRow {
    #[tabled(rename = "Technology")]
    technology: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Subscribers")]
    subscribers: usize,
    #[tabled(rename = "Updated")]
    updated_at: DateTime<Utc>,
}

impl From<TrackedTechnology> for TechnologyRow {
    fn from(t: TrackedTechnology) -> Self {
        Self {
            subscribers: t.subscriber_count(),
            version: t.version.to_string(),
            technology: t.technology,
            updated_at: t.updated_at,
        }
    }
}

/// Execute the technologies command
pub async fn execute(
    args: &TechnologiesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let rows: Vec<TechnologyRow> = store
        .list_tracked_technologies()
        .await?
        .into_iter()
        .filter(|t| {
            args.technology
                .as_deref()
                .is_none_or(|wanted| t.technology == wanted)
        })
        .map(TechnologyRow::from)
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
