//! Subscription handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::request::TechnologyFilter;
use crate::dto::response::{SubscriptionResponse, TechnologyResponse};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /subscribe/{technology}
pub async fn subscribe(
    State(state): State<AppState>,
    Path(technology): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let subscription = state
        .subscription_service
        .subscribe(&technology, body)
        .await?;
    Ok((StatusCode::CREATED, Json(subscription.into())))
}

/// GET /technologies
pub async fn list_technologies(
    State(state): State<AppState>,
    Query(filter): Query<TechnologyFilter>,
) -> Result<Json<Vec<TechnologyResponse>>, ApiError> {
    let tracked = state.subscription_service.tracked_technologies().await?;
    let items = tracked
        .into_iter()
        .filter(|t| {
            filter
                .technology
                .as_deref()
                .is_none_or(|wanted| t.technology == wanted)
        })
        .map(TechnologyResponse::from)
        .collect();
    Ok(Json(items))
}
