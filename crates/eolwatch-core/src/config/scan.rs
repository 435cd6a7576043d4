//! Expiration scan configuration.

use serde::{Deserialize, Serialize};

/// How the scan decides a subscription's webhook secret is acceptable
/// before a delivery is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretPolicy {
    /// The stored subscription secret must be present.
    #[default]
    Subscription,
    /// The stored subscription secret must equal the process-wide secret.
    Process,
}

/// Scheduled expiration scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Whether the scheduled scan runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression with a leading seconds field.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Upper bound on concurrent gateway lookups within one cycle.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    /// Secret check applied before each webhook delivery.
    #[serde(default)]
    pub secret_policy: SecretPolicy,
    /// Push a summary to the chat channel after a cycle that notified anyone.
    #[serde(default = "default_true")]
    pub chat_summary: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
            secret_policy: SecretPolicy::default(),
            chat_summary: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 0 0 * * *".to_string()
}

fn default_max_concurrent_lookups() -> usize {
    8
}
