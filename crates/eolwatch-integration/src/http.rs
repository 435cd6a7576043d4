//! Shared reqwest client construction.

use std::time::Duration;

use eolwatch_core::error::{AppError, ErrorKind};
use eolwatch_core::result::AppResult;

/// Build a client with a fixed user agent and a bounded per-request timeout.
pub fn build_client(user_agent: &str, timeout_seconds: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(timeout_seconds.min(5)))
        .user_agent(user_agent)
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })
}

/// The crate's own user agent, e.g. `eolwatch/0.1.0`.
pub fn default_user_agent() -> String {
    format!("eolwatch/{}", env!("CARGO_PKG_VERSION"))
}

/// Parse a configured base URL, dropping any trailing slash from the path.
pub fn parse_base_url(raw: &str) -> AppResult<reqwest::Url> {
    reqwest::Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| AppError::configuration(format!("Invalid base URL '{raw}': {e}")))
}

/// First `limit` characters of a response body, for log lines.
pub fn truncate_body(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        let url = parse_base_url("https://endoflife.date/api/").unwrap();
        assert_eq!(url.as_str(), "https://endoflife.date/api");
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short", 10), "short");
        assert_eq!(truncate_body("abcdef", 3), "abc...");
    }
}
