//! Typed parsing for every JSON boundary.
//!
//! HTTP handlers, the EOL gateway and the chat client all turn untrusted
//! JSON into domain values through [`Schema::parse`], which either yields
//! a fully checked value or a [`SchemaError`] describing what was wrong.

use serde::de::DeserializeOwned;
use thiserror::Error;

use eolwatch_core::error::AppError;

/// Why a payload did not match its schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The JSON shape or a field type was wrong.
    #[error("malformed payload: {0}")]
    Shape(#[from] serde_json::Error),
    /// The shape was fine but field values broke a constraint.
    #[error("invalid payload: {}", summarize(.0))]
    Invalid(#[from] validator::ValidationErrors),
    /// A constraint that spans fields or is not expressible as a validator rule.
    #[error("invalid payload: {0}")]
    Constraint(String),
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// A value that can be parsed and checked from untrusted JSON.
pub trait Schema: DeserializeOwned {
    /// Semantic checks run after deserialization succeeds.
    fn check(&self) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Parse and check a JSON value.
    fn parse(value: serde_json::Value) -> Result<Self, SchemaError> {
        let parsed: Self = serde_json::from_value(value)?;
        parsed.check()?;
        Ok(parsed)
    }

    /// Parse and check raw JSON bytes.
    fn parse_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        let parsed: Self = serde_json::from_slice(bytes)?;
        parsed.check()?;
        Ok(parsed)
    }
}

/// Flatten validator output into `field: message` pairs.
fn summarize(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join(", ")
}
