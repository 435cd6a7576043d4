//! Payload delivered to subscriber webhooks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use eolwatch_core::types::SubscriptionId;

use crate::subscription::{CycleVersion, Subscription};

/// JSON body POSTed to a subscriber when its window is crossed.
///
/// Never carries the webhook secret; that travels in the
/// `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolNotice {
    /// Human-readable summary.
    pub message: String,
    /// Subscription being notified.
    pub subscription_id: SubscriptionId,
    /// Product name.
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
    /// The subscription's window.
    pub notification_window_days: i32,
    /// End-of-life date, when the authority gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eol: Option<NaiveDate>,
    /// Whole days left until `eol` (negative once past).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<i64>,
}

impl EolNotice {
    /// Build the notice for one qualifying subscription.
    pub fn for_subscription(subscription: &Subscription, eol: NaiveDate, days_to_expiry: i64) -> Self {
        Self {
            message: expiry_message(&subscription.technology, &subscription.version, eol, days_to_expiry),
            subscription_id: subscription.id,
            technology: subscription.technology.clone(),
            version: subscription.version.clone(),
            notification_window_days: subscription.notification_window_days,
            eol: Some(eol),
            days_to_expiry: Some(days_to_expiry),
        }
    }
}

/// `Package node 20 is EOL on 2024-04-30 (in 25 days)` and friends.
pub fn expiry_message(
    technology: &str,
    version: &CycleVersion,
    eol: NaiveDate,
    days_to_expiry: i64,
) -> String {
    let when = match days_to_expiry {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        -1 => "1 day ago".to_string(),
        d if d > 0 => format!("in {d} days"),
        d => format!("{} days ago", -d),
    };
    format!("Package {technology} {version} is EOL on {eol} ({when})")
}
