//! JSON body extractor with JSON error responses.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use crate::error::ApiError;

/// Untyped JSON body. Typed parsing happens in the service layer; a body
/// that is not JSON at all is rejected here with the usual error shape.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
