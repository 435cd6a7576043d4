//! Lifecycle facts reported by the EOL authority for one release cycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// A lifecycle field that is either a flag or a concrete date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LifecycleDate {
    /// `true` / `false` without a date.
    Flag(bool),
    /// A calendar date (`YYYY-MM-DD`).
    Date(NaiveDate),
}

/// Where a cycle stands with respect to end-of-life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolStatus {
    /// The authority reports `eol: false`; no end-of-life is scheduled.
    Unscheduled,
    /// The authority reports `eol: true`; already over, no date given.
    Reached,
    /// End-of-life falls on this date.
    Scheduled(NaiveDate),
}

/// Normalized answer for one `(technology, version)` lookup.
///
/// Only `eol` drives notification decisions; the rest is carried along
/// for logging and payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EolFact {
    /// End-of-life flag or date.
    pub eol: LifecycleDate,
    /// First release of the cycle.
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    /// Latest patch release in the cycle.
    #[serde(default)]
    pub latest: Option<String>,
    /// Date of the latest patch release.
    #[serde(default)]
    pub latest_release_date: Option<NaiveDate>,
    /// Active support end.
    #[serde(default)]
    pub support: Option<LifecycleDate>,
    /// Long-term support flag or start date.
    #[serde(default)]
    pub lts: Option<LifecycleDate>,
    /// Paid extended support flag or end date.
    #[serde(default)]
    pub extended_support: Option<LifecycleDate>,
}

impl Schema for EolFact {}

impl EolFact {
    /// Classify the `eol` field.
    pub fn status(&self) -> EolStatus {
        match self.eol {
            LifecycleDate::Flag(false) => EolStatus::Unscheduled,
            LifecycleDate::Flag(true) => EolStatus::Reached,
            LifecycleDate::Date(date) => EolStatus::Scheduled(date),
        }
    }
}

/// `floor((date at 00:00 UTC - now) / 1 day)`.
///
/// Fractions round toward the earlier day, so a date already in the past
/// yields a negative count.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    const SECONDS_PER_DAY: i64 = 86_400;
    let eol = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (eol - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}
