//! Expiration scan: live EOL facts against subscription windows.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use eolwatch_core::config::{AppConfig, SecretPolicy};
use eolwatch_core::result::AppResult;
use eolwatch_database::SubscriptionStore;
use eolwatch_entity::eol::{EolNotice, EolStatus, days_until};
use eolwatch_entity::subscription::{CycleVersion, Subscription};
use eolwatch_entity::technology::TrackedTechnology;
use eolwatch_integration::telegram::escape_markdown;
use eolwatch_integration::{
    ChatChannel, EndOfLifeClient, EolGateway, Notifier, WebhookDispatcher,
};
use eolwatch_service::secret::delivery_allowed;

use crate::report::ScanReport;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Upper bound on pairs processed at once.
    pub max_concurrent_lookups: usize,
    /// Secret check before each delivery.
    pub secret_policy: SecretPolicy,
    /// Compared against subscription secrets under [`SecretPolicy::Process`].
    pub process_secret: Arc<str>,
    /// Push a chat summary after cycles that notified anyone.
    pub chat_summary: bool,
}

impl ScanSettings {
    /// Settings from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_lookups: config.scan.max_concurrent_lookups.max(1),
            secret_policy: config.scan.secret_policy,
            process_secret: Arc::from(config.security.webhook_secret.as_str()),
            chat_summary: config.scan.chat_summary,
        }
    }
}

/// How one pair went.
#[derive(Debug)]
enum PairOutcome {
    LookupFailed,
    NoEol,
    NoSubscribers,
    Evaluated(PairSummary),
}

/// Delivery tallies for a pair that had a date and subscribers.
#[derive(Debug)]
struct PairSummary {
    technology: String,
    version: CycleVersion,
    eol: NaiveDate,
    days_to_expiry: i64,
    qualifying: usize,
    delivered: usize,
    failed: usize,
    rejected_secret: usize,
}

/// The scheduled orchestrator.
///
/// Stateless between runs: every cycle re-reads the store and the EOL
/// authority. Failures stay local to the pair or subscription they hit.
#[derive(Clone)]
pub struct ExpirationScanJob {
    store: Arc<dyn SubscriptionStore>,
    gateway: Arc<dyn EolGateway>,
    notifier: Arc<dyn Notifier>,
    chat: Option<Arc<dyn ChatChannel>>,
    settings: ScanSettings,
}

impl std::fmt::Debug for ExpirationScanJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirationScanJob")
            .field("max_concurrent_lookups", &self.settings.max_concurrent_lookups)
            .field("secret_policy", &self.settings.secret_policy)
            .field("chat_enabled", &self.chat.is_some())
            .finish()
    }
}

impl ExpirationScanJob {
    /// Create a new scan job.
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        gateway: Arc<dyn EolGateway>,
        notifier: Arc<dyn Notifier>,
        chat: Option<Arc<dyn ChatChannel>>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            notifier,
            chat,
            settings,
        }
    }

    /// Wire a job from configuration with the HTTP gateway and dispatcher.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn SubscriptionStore>,
        chat: Option<Arc<dyn ChatChannel>>,
    ) -> AppResult<Self> {
        let gateway: Arc<dyn EolGateway> = Arc::new(EndOfLifeClient::new(&config.endoflife)?);
        let notifier: Arc<dyn Notifier> = Arc::new(WebhookDispatcher::new(&config.webhook)?);
        Ok(Self::new(
            store,
            gateway,
            notifier,
            chat,
            ScanSettings::from_config(config),
        ))
    }

    /// Run one cycle as of `now`.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> ScanReport {
        let span = info_span!("scan_cycle", cycle_id = %Uuid::new_v4());
        async move {
            let mut report = ScanReport::default();

            let tracked = match self.store.list_tracked_technologies().await {
                Ok(tracked) => tracked,
                Err(e) => {
                    error!(error = %e, "Could not read tracked technologies; skipping cycle");
                    return report;
                }
            };
            if tracked.is_empty() {
                info!("No tracked technologies; nothing to scan");
                return report;
            }
            report.pairs_total = tracked.len();

            let outcomes: Vec<PairOutcome> = stream::iter(tracked)
                .map(|entry| self.process_pair(entry, now))
                .buffer_unordered(self.settings.max_concurrent_lookups)
                .collect()
                .await;

            let mut evaluated = Vec::new();
            for outcome in outcomes {
                match outcome {
                    PairOutcome::LookupFailed => report.pairs_failed_lookup += 1,
                    PairOutcome::NoEol => report.pairs_skipped_no_eol += 1,
                    PairOutcome::NoSubscribers => report.pairs_without_subscribers += 1,
                    PairOutcome::Evaluated(summary) => {
                        report.qualifying += summary.qualifying;
                        report.delivered += summary.delivered;
                        report.delivery_failed += summary.failed;
                        report.rejected_secret += summary.rejected_secret;
                        if summary.qualifying > 0 {
                            evaluated.push(summary);
                        }
                    }
                }
            }

            if self.settings.chat_summary && report.notified_anyone() {
                self.push_summary(&report, evaluated).await;
            }

            info!(
                pairs_total = report.pairs_total,
                pairs_skipped_no_eol = report.pairs_skipped_no_eol,
                pairs_failed_lookup = report.pairs_failed_lookup,
                pairs_without_subscribers = report.pairs_without_subscribers,
                qualifying = report.qualifying,
                delivered = report.delivered,
                delivery_failed = report.delivery_failed,
                rejected_secret = report.rejected_secret,
                "Scan cycle finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn process_pair(&self, entry: TrackedTechnology, now: DateTime<Utc>) -> PairOutcome {
        let TrackedTechnology {
            technology,
            version,
            ..
        } = entry;

        let fact = match self.gateway.fetch_cycle_details(&technology, &version).await {
            Ok(fact) => fact,
            Err(e) => {
                warn!(%technology, %version, error = %e, "EOL lookup failed; skipping pair this cycle");
                return PairOutcome::LookupFailed;
            }
        };

        let eol = match fact.status() {
            EolStatus::Scheduled(date) => date,
            EolStatus::Unscheduled => {
                debug!(%technology, %version, "No end-of-life scheduled");
                return PairOutcome::NoEol;
            }
            EolStatus::Reached => {
                info!(%technology, %version, "Cycle already past end-of-life without a date");
                return PairOutcome::NoEol;
            }
        };
        let days_to_expiry = days_until(eol, now);

        let subscriptions = match self.store.get_subscriptions_for(&technology, &version).await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                error!(%technology, %version, error = %e, "Could not load subscriptions");
                Vec::new()
            }
        };
        if subscriptions.is_empty() {
            debug!(%technology, %version, "No subscriptions for pair");
            return PairOutcome::NoSubscribers;
        }

        let qualifying: Vec<Subscription> = subscriptions
            .into_iter()
            .filter(|s| s.qualifies(days_to_expiry))
            .collect();

        let mut summary = PairSummary {
            technology,
            version,
            eol,
            days_to_expiry,
            qualifying: qualifying.len(),
            delivered: 0,
            failed: 0,
            rejected_secret: 0,
        };

        let mut deliveries = Vec::with_capacity(qualifying.len());
        for subscription in &qualifying {
            if !delivery_allowed(
                self.settings.secret_policy,
                &subscription.webhook_secret,
                &self.settings.process_secret,
            ) {
                warn!(subscription_id = %subscription.id, "Webhook secret rejected; not sending");
                summary.rejected_secret += 1;
                continue;
            }
            deliveries.push((
                subscription,
                EolNotice::for_subscription(subscription, eol, days_to_expiry),
            ));
        }

        let results = join_all(
            deliveries
                .iter()
                .map(|(subscription, notice)| self.notifier.notify(subscription, notice)),
        )
        .await;

        for result in results {
            if result.is_success() {
                summary.delivered += 1;
            } else {
                summary.failed += 1;
            }
        }

        debug!(
            technology = %summary.technology,
            version = %summary.version,
            days_to_expiry,
            qualifying = summary.qualifying,
            delivered = summary.delivered,
            "Pair evaluated"
        );
        PairOutcome::Evaluated(summary)
    }

    /// Best-effort Markdown summary to the operator chat.
    async fn push_summary(&self, report: &ScanReport, mut pairs: Vec<PairSummary>) {
        let Some(chat) = &self.chat else {
            return;
        };

        pairs.sort_by(|a, b| a.days_to_expiry.cmp(&b.days_to_expiry));
        let mut text = format!(
            "*EOL scan*: {} of {} notices delivered",
            report.delivered, report.qualifying
        );
        for pair in &pairs {
            text.push_str(&format!(
                "\n- {} {} ends {} ({} days): {} delivered, {} failed",
                escape_markdown(&pair.technology),
                pair.version,
                pair.eol,
                pair.days_to_expiry,
                pair.delivered,
                pair.failed + pair.rejected_secret
            ));
        }

        if let Err(e) = chat.send_message(&text).await {
            warn!(error = %e, "Scan summary was not pushed to chat");
        }
    }
}
