//! Integration tests for the HTTP API.

mod helpers;

use http::StatusCode;
use serde_json::json;

use eolwatch_database::SubscriptionStore;
use eolwatch_entity::subscription::CycleVersion;

use helpers::{PROCESS_SECRET, TestApp, subscription_body, telegram_mock};

#[tokio::test]
async fn test_service_info() {
    let app = TestApp::new();
    let response = app.request("GET", "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "eolwatch");
    assert!(response.body["example"].as_str().unwrap().contains("/subscribe/"));
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "connected");
}

#[tokio::test]
async fn test_subscribe_stores_and_indexes() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/subscribe/node",
            Some(subscription_body(json!(20), 30, "https://x.example/h", "s")),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["technology"], "node");
    assert_eq!(response.body["version"], "20");
    assert_eq!(response.body["notification_window_days"], 30);
    assert!(response.body.get("id").is_some());
    assert!(response.body.get("webhook_secret").is_none());

    let stored = app
        .store
        .get_subscriptions_for("node", &CycleVersion::from(20))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].webhook_url, "https://x.example/h");
    assert_eq!(stored[0].webhook_secret, "s");

    let tracked = app.store.list_tracked_technologies().await.unwrap();
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].subscription_ids, vec![stored[0].id]);
}

#[tokio::test]
async fn test_subscribe_path_wins_over_body_technology() {
    let app = TestApp::new();
    let mut body = subscription_body(json!("3.12"), 14, "https://x.example/h", "s");
    body["technology"] = json!("ruby");

    let response = app.request("POST", "/subscribe/python", Some(body)).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["technology"], "python");
    assert_eq!(response.body["version"], "3.12");
}

#[tokio::test]
async fn test_subscribe_rejects_out_of_range_window() {
    let app = TestApp::new();
    for window in [0, 366] {
        let response = app
            .request(
                "POST",
                "/subscribe/node",
                Some(subscription_body(json!(20), window, "https://x.example/h", "s")),
            )
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "window={window}");
        assert_eq!(response.body["code"], "VALIDATION");
        assert!(response.body["error"].as_str().is_some());
    }
    assert_eq!(app.store.subscription_count(), 0);
}

#[tokio::test]
async fn test_subscribe_rejects_missing_fields_and_bad_json() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/subscribe/node", Some(json!({ "version": 20 })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.raw_request("POST", "/subscribe/node", "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = app
        .request("POST", "/subscribe/node", Some(json!(["not", "an", "object"])))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.subscription_count(), 0);
}

#[tokio::test]
async fn test_subscribe_rejects_blank_secret() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/subscribe/node",
            Some(subscription_body(json!(20), 30, "https://x.example/h", "   ")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION");
    assert_eq!(app.store.subscription_count(), 0);
}

#[tokio::test]
async fn test_subscribe_rejects_oversized_body() {
    let app = TestApp::new();
    let padding = "x".repeat(app.config.server.body_limit_bytes + 1);
    let mut body = subscription_body(json!(20), 30, "https://x.example/h", "s");
    body["note"] = json!(padding);

    let response = app.request("POST", "/subscribe/node", Some(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.store.subscription_count(), 0);
}

#[tokio::test]
async fn test_technologies_lists_distinct_pairs() {
    let app = TestApp::new();
    let pairs = [
        ("node", json!(20)),
        ("node", json!(20)),
        ("node", json!(18)),
        ("python", json!("3.12")),
    ];
    for (tech, version) in pairs {
        let response = app
            .request(
                "POST",
                &format!("/subscribe/{tech}"),
                Some(subscription_body(version, 30, "https://x.example/h", "s")),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app.request("GET", "/technologies", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let items = response.body.as_array().unwrap();
    assert_eq!(items.len(), 3);

    let node_20 = items
        .iter()
        .find(|t| t["technology"] == "node" && t["version"] == "20")
        .unwrap();
    assert_eq!(node_20["subscribers"], 2);
    assert!(!response.body.to_string().contains("webhook_secret"));

    let response = app.request("GET", "/technologies?technology=python", None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_callback_with_wrong_secret_is_unauthorized() {
    let (telegram, chat) = telegram_mock().await;
    let app = TestApp::with_chat(Some(chat));

    let mut body = subscription_body(json!(20), 30, "https://x.example/h", "wrong");
    body["technology"] = json!("node");
    let response = app.request("POST", "/callback", Some(body)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHORIZED");

    let pushed = telegram.received_requests().await.unwrap();
    assert!(pushed.is_empty());
}

#[tokio::test]
async fn test_callback_pushes_to_chat() {
    let (telegram, chat) = telegram_mock().await;
    let app = TestApp::with_chat(Some(chat));

    let mut body = subscription_body(json!(20), 30, "https://x.example/h", PROCESS_SECRET);
    body["technology"] = json!("node");
    let response = app.request("POST", "/callback", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Package node 20 is EOL");
    assert_eq!(response.body["chat_delivered"], true);

    let pushed = telegram.received_requests().await.unwrap();
    assert_eq!(pushed.len(), 1);
    let query: Vec<(String, String)> = pushed[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(query.contains(&("chat_id".to_string(), "-1001".to_string())));
    assert!(query.contains(&("parse_mode".to_string(), "Markdown".to_string())));
}

#[tokio::test]
async fn test_callback_without_chat_still_succeeds() {
    let app = TestApp::new();
    let mut body = subscription_body(json!(20), 30, "https://x.example/h", PROCESS_SECRET);
    body["technology"] = json!("node");

    let response = app.request("POST", "/callback", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["chat_delivered"], false);
}

#[tokio::test]
async fn test_callback_rejects_invalid_payload() {
    let (telegram, chat) = telegram_mock().await;
    let app = TestApp::with_chat(Some(chat));

    let response = app
        .request("POST", "/callback", Some(json!({ "technology": "node" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(telegram.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let response = app.request("GET", "/nope", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
