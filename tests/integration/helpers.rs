//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eolwatch_api::{AppState, build_app};
use eolwatch_core::config::{AppConfig, StoreProvider, TelegramConfig};
use eolwatch_database::SubscriptionStore;
use eolwatch_database::store::memory::MemorySubscriptionStore;
use eolwatch_integration::{ChatChannel, TelegramClient};
use eolwatch_service::{CallbackService, SubscriptionService};

/// Secret configured as `security.webhook_secret` in tests.
pub const PROCESS_SECRET: &str = "process-secret";

/// Config for an in-process app with no external services.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = StoreProvider::Memory;
    config.security.webhook_secret = PROCESS_SECRET.to_string();
    config.telegram.enabled = false;
    config.scan.chat_summary = false;
    config
}

/// A subscription body as a client would send it.
pub fn subscription_body(version: Value, window: i64, webhook_url: &str, secret: &str) -> Value {
    json!({
        "version": version,
        "notification_window_days": window,
        "webhook_url": webhook_url,
        "webhook_secret": secret,
    })
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The store behind the router
    pub store: Arc<MemorySubscriptionStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// App with the chat channel disabled.
    pub fn new() -> Self {
        Self::with_chat(None)
    }

    /// App pushing callbacks to `chat`.
    pub fn with_chat(chat: Option<Arc<dyn ChatChannel>>) -> Self {
        let config = test_config();
        let store = Arc::new(MemorySubscriptionStore::new());
        let dyn_store: Arc<dyn SubscriptionStore> = store.clone();

        let state = AppState {
            config: Arc::new(config.clone()),
            subscription_service: Arc::new(SubscriptionService::new(dyn_store)),
            callback_service: Arc::new(CallbackService::new(PROCESS_SECRET, chat)),
        };

        Self {
            router: build_app(state),
            store,
            config,
        }
    }

    /// Send a JSON request through the router.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.raw_request(method, path, &body_str).await
    }

    /// Send `body` verbatim with a JSON content type.
    pub async fn raw_request(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A mock Bot API that accepts every `sendMessage`, plus a client for it.
pub async fn telegram_mock() -> (MockServer, Arc<dyn ChatChannel>) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/bot[^/]+/sendMessage$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "from": { "id": 99, "is_bot": true, "first_name": "eolwatch" },
                "chat": { "id": -1001, "type": "supergroup", "title": "ops" },
                "date": 1712300000,
                "text": "Package node 20 is EOL"
            }
        })))
        .mount(&server)
        .await;

    let client = TelegramClient::new(&TelegramConfig {
        enabled: true,
        base_url: server.uri(),
        bot_token: "123:abc".to_string(),
        chat_id: "-1001".to_string(),
        timeout_seconds: 2,
    })
    .expect("Failed to build telegram client");

    (server, Arc::new(client))
}
