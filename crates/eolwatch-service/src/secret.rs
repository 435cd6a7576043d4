//! Webhook secret checks.

use eolwatch_core::config::SecretPolicy;

/// Compare two secrets without short-circuiting on the first differing byte.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Whether a delivery carrying `subscription_secret` may be sent.
pub fn delivery_allowed(policy: SecretPolicy, subscription_secret: &str, process_secret: &str) -> bool {
    if subscription_secret.trim().is_empty() {
        return false;
    }
    match policy {
        SecretPolicy::Subscription => true,
        SecretPolicy::Process => secrets_match(subscription_secret, process_secret),
    }
}
