//! eolwatch server: end-of-life webhook notifications.
//!
//! Wires the store, outbound clients, services, HTTP API and the scan
//! scheduler together and runs until Ctrl-C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use eolwatch_api::{AppState, build_app, serve};
use eolwatch_core::config::AppConfig;
use eolwatch_core::error::AppError;
use eolwatch_database::StoreManager;
use eolwatch_integration::TelegramClient;
use eolwatch_service::{CallbackService, SubscriptionService};
use eolwatch_worker::{CronScheduler, ExpirationScanJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("EOLWATCH_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration (env: {env}): {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting eolwatch v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Store ────────────────────────────────────────────────────
    let store = StoreManager::new(&config.database).await?.store();

    // ── Outbound clients ─────────────────────────────────────────
    let chat = TelegramClient::from_config(&config.telegram)?;
    if chat.is_none() {
        tracing::warn!("Telegram disabled; callbacks and scan summaries will not reach chat");
    }

    // ── Services ─────────────────────────────────────────────────
    let subscription_service = Arc::new(SubscriptionService::new(Arc::clone(&store)));
    let callback_service = Arc::new(CallbackService::new(
        config.security.webhook_secret.as_str(),
        chat.clone(),
    ));

    // ── Scheduler ────────────────────────────────────────────────
    let scheduler = if config.scan.enabled {
        let job = Arc::new(ExpirationScanJob::from_config(
            &config,
            Arc::clone(&store),
            chat,
        )?);
        let scheduler = CronScheduler::new().await?;
        scheduler
            .register_expiration_scan(job, &config.scan.schedule)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Expiration scan disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let state = AppState {
        config: Arc::clone(&config),
        subscription_service,
        callback_service,
    };
    let app = build_app(state);
    let served = serve(app, &config.server, shutdown_signal()).await;

    // ── Shutdown ─────────────────────────────────────────────────
    if let Some(scheduler) = scheduler {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Scheduler shutdown failed: {}", e),
            Err(_) => tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Scan cycle still running at shutdown; abandoning it"
            ),
        }
    }

    served?;
    tracing::info!("eolwatch stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
