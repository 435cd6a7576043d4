//! Subscription entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use eolwatch_core::types::SubscriptionId;

use super::version::CycleVersion;
use crate::schema::Schema;

/// Smallest accepted notification window.
pub const MIN_WINDOW_DAYS: i32 = 1;
/// Largest accepted notification window.
pub const MAX_WINDOW_DAYS: i32 = 365;

/// A stored request to be told when a release cycle nears end-of-life.
///
/// Immutable once created.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Store-assigned identifier.
    pub id: SubscriptionId,
    /// Product name as known to the EOL authority (e.g. `nodejs`).
    pub technology: String,
    /// Release cycle of the product.
    pub version: CycleVersion,
    /// Notify once fewer than this many days remain.
    pub notification_window_days: i32,
    /// Where notifications are POSTed.
    pub webhook_url: String,
    /// Sent back to the subscriber as a bearer credential.
    pub webhook_secret: String,
    /// When the subscription was stored.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Materialize a stored record from validated input.
    pub fn from_new(id: SubscriptionId, new: NewSubscription, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            technology: new.technology,
            version: new.version,
            notification_window_days: new.notification_window_days,
            webhook_url: new.webhook_url,
            webhook_secret: new.webhook_secret,
            created_at,
        }
    }

    /// Whether a cycle `days_to_expiry` days from its EOL is inside this
    /// subscription's window. Already-expired cycles (negative days) always
    /// qualify.
    pub fn qualifies(&self, days_to_expiry: i64) -> bool {
        days_to_expiry <= i64::from(self.notification_window_days)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("technology", &self.technology)
            .field("version", &self.version)
            .field("notification_window_days", &self.notification_window_days)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Validated subscription input, before the store assigns an id.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct NewSubscription {
    /// Product name.
    #[validate(
        length(min = 1, max = 100, message = "must be 1-100 characters"),
        custom(function = "validate_technology")
    )]
    pub technology: String,
    /// Release cycle.
    pub version: CycleVersion,
    /// Days before EOL at which to notify.
    #[serde(alias = "days_before_expire", alias = "days_to_expire")]
    #[validate(range(
        min = MIN_WINDOW_DAYS,
        max = MAX_WINDOW_DAYS,
        message = "must be a whole number of days between 1 and 365"
    ))]
    pub notification_window_days: i32,
    /// Delivery target.
    #[validate(url(message = "must be an absolute URL"), custom(function = "validate_http_scheme"))]
    pub webhook_url: String,
    /// Credential echoed to the target.
    #[validate(
        length(min = 1, max = 512, message = "must be 1-512 characters"),
        custom(function = "validate_secret")
    )]
    pub webhook_secret: String,
}

impl Schema for NewSubscription {
    fn check(&self) -> Result<(), crate::schema::SchemaError> {
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for NewSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewSubscription")
            .field("technology", &self.technology)
            .field("version", &self.version)
            .field("notification_window_days", &self.notification_window_days)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &"<redacted>")
            .finish()
    }
}

/// Product names end up as a URL path segment of the EOL authority.
fn validate_technology(technology: &str) -> Result<(), ValidationError> {
    let ok = technology
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        && !technology.contains("..");
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("technology");
        err.message = Some("may only contain letters, digits, '-', '_' and '.'".into());
        Err(err)
    }
}

fn validate_http_scheme(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("scheme");
        err.message = Some("must use http or https".into());
        Err(err)
    }
}

/// Delivery treats a blank secret as absent, so intake must not store one.
fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
