//! Release-cycle version identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::SchemaError;

/// A numeric release-cycle identifier such as `20` or `3.11`.
///
/// Accepts a JSON number or a numeric string. The textual form is kept as
/// given (after trimming) so cycles like `3.10` and `3.1` stay distinct.
/// Whole JSON numbers such as `20.0` become `20`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CycleVersion(String);

impl CycleVersion {
    /// Parse a textual version.
    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        let trimmed = raw.trim();
        if is_numeric_cycle(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(SchemaError::Constraint(format!(
                "version '{raw}' is not a numeric release cycle"
            )))
        }
    }

    /// The version as it appears in URLs and storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `digits` or `digits.digits`.
fn is_numeric_cycle(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let major = parts.next().unwrap_or_default();
    let minor = parts.next();
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    all_digits(major) && minor.is_none_or(all_digits)
}

impl fmt::Display for CycleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CycleVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for CycleVersion {
    fn from(major: u32) -> Self {
        Self(major.to_string())
    }
}

/// Whole JSON numbers (`20.0`, `2e1`) render without a fraction or exponent.
fn number_text(n: &serde_json::Number) -> String {
    if n.is_u64() || n.is_i64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
            (f as u64).to_string()
        }
        _ => n.to_string(),
    }
}

impl<'de> Deserialize<'de> for CycleVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => number_text(&n),
            Raw::Text(s) => s,
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
