//! Service metadata.

use axum::Json;

use crate::dto::response::ServiceInfo;

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "eolwatch".to_string(),
        description: "Webhook notifications before software versions reach end-of-life".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        example: "POST /subscribe/nodejs {\"version\": 20, \"notification_window_days\": 30, \
                  \"webhook_url\": \"https://example.org/hook\", \"webhook_secret\": \"...\"}"
            .to_string(),
    })
}
