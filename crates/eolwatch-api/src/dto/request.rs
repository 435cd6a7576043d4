//! Request DTOs.

use serde::Deserialize;

/// `GET /technologies` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnologyFilter {
    /// Only pairs for this technology.
    #[serde(default)]
    pub technology: Option<String>,
}
