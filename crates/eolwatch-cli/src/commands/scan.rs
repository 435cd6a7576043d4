//! One-off expiration scan.

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use eolwatch_core::config::AppConfig;
use eolwatch_core::error::AppError;
use eolwatch_integration::TelegramClient;
use eolwatch_worker::{ExpirationScanJob, ScanReport};

use crate::output::{self, OutputFormat};

/// Arguments for the scan command
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Evaluate windows as of this date (YYYY-MM-DD) instead of now
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Skip the chat channel even when it is enabled
    #[arg(long)]
    pub no_chat: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ReportRow {
    #[tabled(rename = "Pairs")]
    pairs_total: usize,
    #[tabled(rename = "No EOL")]
    pairs_skipped_no_eol: usize,
    #[tabled(rename = "Lookup failed")]
    pairs_failed_lookup: usize,
    #[tabled(rename = "No subscribers")]
    pairs_without_subscribers: usize,
    #[tabled(rename = "Qualifying")]
    qualifying: usize,
    #[tabled(rename = "Delivered")]
    delivered: usize,
    #[tabled(rename = "Failed")]
    delivery_failed: usize,
    #[tabled(rename = "Secret rejected")]
    rejected_secret: usize,
}

impl From<ScanReport> for ReportRow {
    fn from(r: ScanReport) -> Self {
        Self {
            pairs_total: r.pairs_total,
            pairs_skipped_no_eol: r.pairs_skipped_no_eol,
            pairs_failed_lookup: r.pairs_failed_lookup,
            pairs_without_subscribers: r.pairs_without_subscribers,
            qualifying: r.qualifying,
            delivered: r.delivered,
            delivery_failed: r.delivery_failed,
            rejected_secret: r.rejected_secret,
        }
    }
}

/// Execute the scan command
pub async fn execute(
    args: &ScanArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let chat = if args.no_chat {
        None
    } else {
        TelegramClient::from_config(&config.telegram)?
    };
    let job = ExpirationScanJob::from_config(config, store.store(), chat)?;

    let now = match args.as_of {
        Some(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let report = job.run_cycle(now).await;

    output::print_item(&ReportRow::from(report), format);
    if report.delivery_failed > 0 || report.pairs_failed_lookup > 0 {
        output::print_warning("Some lookups or deliveries failed; see the log for details.");
    }
    Ok(())
}
