//! Callback handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::CallbackResponse;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /callback
pub async fn callback(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<CallbackResponse>, ApiError> {
    let outcome = state.callback_service.handle(body).await?;
    Ok(Json(outcome.into()))
}
