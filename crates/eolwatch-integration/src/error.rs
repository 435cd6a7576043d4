//! Failures talking to outbound collaborators.

use thiserror::Error;

use eolwatch_core::error::{AppError, ErrorKind};
use eolwatch_entity::SchemaError;

/// Error from an outbound HTTP collaborator.
///
/// Every variant is local to one lookup or send; none is fatal.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The EOL authority answered with a non-success status.
    #[error("EOL lookup for '{technology}' returned HTTP {status}")]
    Gateway {
        /// Technology that was looked up.
        technology: String,
        /// Upstream status code.
        status: u16,
    },

    /// The EOL authority answered 2xx with a body that is not an EOL fact.
    #[error("EOL authority sent malformed data for '{technology}': {source}")]
    DataFormat {
        /// Technology that was looked up.
        technology: String,
        /// Why the body was rejected.
        #[source]
        source: SchemaError,
    },

    /// Connect failure, timeout, or an unreadable response body.
    #[error("request to {target} failed: {source}")]
    Transport {
        /// Which collaborator was being called.
        target: &'static str,
        /// Underlying client error, with any URL stripped.
        #[source]
        source: reqwest::Error,
    },

    /// The chat API refused the message or answered with something else.
    #[error("chat channel rejected message: {0}")]
    ChatRejected(String),
}

impl IntegrationError {
    /// Wrap a client error. The URL is dropped since it may embed credentials.
    pub fn transport(target: &'static str, source: reqwest::Error) -> Self {
        Self::Transport {
            target,
            source: source.without_url(),
        }
    }
}

impl From<IntegrationError> for AppError {
    fn from(err: IntegrationError) -> Self {
        AppError::with_source(ErrorKind::ExternalService, err.to_string(), err)
    }
}
