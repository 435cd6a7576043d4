//! End-to-end scan cycles against mock upstreams and the in-memory store.

mod helpers;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use http::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eolwatch_core::config::{AppConfig, SecretPolicy};
use eolwatch_database::SubscriptionStore;
use eolwatch_worker::{ExpirationScanJob, ScanReport};

use helpers::{PROCESS_SECRET, TestApp, subscription_body, test_config};

fn april_5th() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap()
}

fn scan_job(app: &TestApp, config: &AppConfig) -> ExpirationScanJob {
    let store: Arc<dyn SubscriptionStore> = app.store.clone();
    ExpirationScanJob::from_config(config, store, None).unwrap()
}

fn config_for(upstream: &MockServer) -> AppConfig {
    let mut config = test_config();
    config.endoflife.base_url = upstream.uri();
    config.endoflife.timeout_seconds = 2;
    config.webhook.timeout_seconds = 2;
    config
}

async fn mount_cycle(upstream: &MockServer, technology: &str, version: &str, eol: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{technology}/{version}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "releaseDate": "2023-04-18",
            "latest": format!("{version}.12.2"),
            "latestReleaseDate": "2024-04-03",
            "support": "2024-10-22",
            "lts": "2023-10-24",
            "eol": eol,
        })))
        .mount(upstream)
        .await;
}

async fn subscribe(
    app: &TestApp,
    technology: &str,
    version: Value,
    window: i64,
    url: &str,
    secret: &str,
) {
    let response = app
        .request(
            "POST",
            &format!("/subscribe/{technology}"),
            Some(subscription_body(version, window, url, secret)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
}

#[tokio::test]
async fn test_subscribed_pair_inside_window_is_notified_once() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let hook = format!("{}/hook", upstream.uri());

    subscribe(&app, "node", json!(20), 30, &hook, "s").await;
    mount_cycle(&upstream, "node", "20", json!("2024-04-30")).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("Authorization", "Bearer s"))
        .and(header("User-Agent", "eol-notify"))
        .and(body_partial_json(json!({
            "technology": "node",
            "version": "20",
            "notification_window_days": 30,
            "eol": "2024-04-30",
            "days_to_expiry": 25,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&upstream)
        .await;

    let report = scan_job(&app, &config_for(&upstream))
        .run_cycle(april_5th())
        .await;

    assert_eq!(
        report,
        ScanReport {
            pairs_total: 1,
            qualifying: 1,
            delivered: 1,
            ..ScanReport::default()
        }
    );
    upstream.verify().await;
}

#[tokio::test]
async fn test_unscheduled_eol_sends_nothing() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let hook = format!("{}/hook", upstream.uri());

    subscribe(&app, "node", json!(20), 30, &hook, "s").await;
    mount_cycle(&upstream, "node", "20", json!(false)).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let report = scan_job(&app, &config_for(&upstream))
        .run_cycle(april_5th())
        .await;

    assert_eq!(report.pairs_skipped_no_eol, 1);
    assert_eq!(report.qualifying, 0);
    upstream.verify().await;
}

#[tokio::test]
async fn test_only_subscriptions_inside_their_window_fire() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let wide = format!("{}/wide", upstream.uri());
    let narrow = format!("{}/narrow", upstream.uri());

    subscribe(&app, "node", json!(20), 30, &wide, "s").await;
    subscribe(&app, "node", json!(20), 7, &narrow, "s").await;
    mount_cycle(&upstream, "node", "20", json!("2024-04-30")).await;

    Mock::given(method("POST"))
        .and(path("/wide"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/narrow"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&upstream)
        .await;

    let report = scan_job(&app, &config_for(&upstream))
        .run_cycle(april_5th())
        .await;

    assert_eq!(report.qualifying, 1);
    assert_eq!(report.delivered, 1);
    upstream.verify().await;
}

#[tokio::test]
async fn test_failing_webhook_does_not_block_siblings_or_other_pairs() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let broken = format!("{}/broken", upstream.uri());
    let healthy = format!("{}/healthy", upstream.uri());

    subscribe(&app, "node", json!(20), 60, &broken, "s").await;
    subscribe(&app, "node", json!(20), 60, &healthy, "s").await;
    subscribe(&app, "python", json!("3.8"), 60, &healthy, "s").await;
    mount_cycle(&upstream, "node", "20", json!("2024-04-30")).await;
    mount_cycle(&upstream, "python", "3.8", json!("2024-04-20")).await;

    Mock::given(method("POST"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/healthy"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&upstream)
        .await;

    let report = scan_job(&app, &config_for(&upstream))
        .run_cycle(april_5th())
        .await;

    assert_eq!(report.pairs_total, 2);
    assert_eq!(report.qualifying, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.delivery_failed, 1);
    upstream.verify().await;
}

#[tokio::test]
async fn test_unknown_cycle_is_skipped_for_this_cycle() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let hook = format!("{}/hook", upstream.uri());

    subscribe(&app, "node", json!(99), 30, &hook, "s").await;
    Mock::given(method("GET"))
        .and(path("/node/99.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let report = scan_job(&app, &config_for(&upstream))
        .run_cycle(april_5th())
        .await;

    assert_eq!(report.pairs_failed_lookup, 1);
    upstream.verify().await;
}

#[tokio::test]
async fn test_process_policy_withholds_mismatched_secrets() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let hook = format!("{}/hook", upstream.uri());

    subscribe(&app, "node", json!(20), 30, &hook, PROCESS_SECRET).await;
    subscribe(&app, "node", json!(20), 30, &hook, "someone-else").await;
    mount_cycle(&upstream, "node", "20", json!("2024-04-30")).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("Authorization", format!("Bearer {PROCESS_SECRET}").as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut config = config_for(&upstream);
    config.scan.secret_policy = SecretPolicy::Process;
    let report = scan_job(&app, &config).run_cycle(april_5th()).await;

    assert_eq!(report.qualifying, 2);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.rejected_secret, 1);

    let requests = upstream.received_requests().await.unwrap();
    let posted = requests.iter().filter(|r| r.url.path() == "/hook").count();
    assert_eq!(posted, 1);
    upstream.verify().await;
}

#[tokio::test]
async fn test_repeat_cycles_notify_again() {
    let upstream = MockServer::start().await;
    let app = TestApp::new();
    let hook = format!("{}/hook", upstream.uri());

    subscribe(&app, "node", json!(20), 30, &hook, "s").await;
    mount_cycle(&upstream, "node", "20", json!("2024-04-30")).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&upstream)
        .await;

    let job = scan_job(&app, &config_for(&upstream));
    job.run_cycle(april_5th()).await;
    job.run_cycle(april_5th() + chrono::Duration::days(1)).await;

    upstream.verify().await;
}
