//! Per-cycle counters.

use serde::Serialize;

/// What one scan cycle did. Partial failures are counted, never raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Tracked pairs considered.
    pub pairs_total: usize,
    /// Pairs whose EOL is unscheduled or already reached without a date.
    pub pairs_skipped_no_eol: usize,
    /// Pairs whose gateway lookup failed.
    pub pairs_failed_lookup: usize,
    /// Pairs with a date but no resolvable subscribers.
    pub pairs_without_subscribers: usize,
    /// Subscriptions inside their window.
    pub qualifying: usize,
    /// Deliveries the target acknowledged.
    pub delivered: usize,
    /// Deliveries rejected or unreachable.
    pub delivery_failed: usize,
    /// Qualifying subscriptions skipped by the secret check.
    pub rejected_secret: usize,
}

impl ScanReport {
    /// Whether any subscription was inside its window.
    pub fn notified_anyone(&self) -> bool {
        self.qualifying > 0
    }
}
