//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and environment variables. Each sub-module represents a
//! logical configuration section.

pub mod app;
pub mod database;
pub mod integrations;
pub mod logging;
pub mod scan;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseConfig, StoreProvider};
pub use self::integrations::{EndOfLifeConfig, SecurityConfig, TelegramConfig, WebhookConfig};
pub use self::logging::LoggingConfig;
pub use self::scan::{ScanConfig, SecretPolicy};

use crate::error::AppError;

/// Unprefixed environment variables honoured for deployment convenience.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("WEBHOOK_SECRET", "security.webhook_secret"),
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
    ("DATABASE_URL", "database.url"),
];

/// Root application configuration.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Subscription store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Scheduled scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// EOL data authority.
    #[serde(default)]
    pub endoflife: EndOfLifeConfig,
    /// Webhook delivery.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Operator chat channel.
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Inbound authorization secrets.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml`, variables prefixed
    /// with `EOLWATCH__`, and finally the unprefixed aliases in
    /// [`ENV_ALIASES`]. The result is validated before it is returned.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("EOLWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_ALIASES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements the schema alone cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.security.webhook_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "security.webhook_secret (WEBHOOK_SECRET) must be set",
            ));
        }

        if self.telegram.enabled {
            if self.telegram.bot_token.trim().is_empty() {
                return Err(AppError::configuration(
                    "telegram.bot_token (TELEGRAM_BOT_TOKEN) must be set",
                ));
            }
            if !self.telegram.chat_id_is_valid() {
                return Err(AppError::configuration(format!(
                    "telegram.chat_id '{}' must be a numeric id or @channel handle",
                    self.telegram.chat_id
                )));
            }
        }

        if self.database.provider == StoreProvider::Postgres && self.database.url.trim().is_empty()
        {
            return Err(AppError::configuration(
                "database.url (DATABASE_URL) is required for the postgres provider",
            ));
        }

        if self.scan.schedule.trim().is_empty() {
            return Err(AppError::configuration("scan.schedule must not be empty"));
        }

        if self.scan.max_concurrent_lookups == 0 {
            return Err(AppError::configuration(
                "scan.max_concurrent_lookups must be at least 1",
            ));
        }

        let timeouts = [
            ("endoflife.timeout_seconds", self.endoflife.timeout_seconds),
            ("webhook.timeout_seconds", self.webhook.timeout_seconds),
            ("telegram.timeout_seconds", self.telegram.timeout_seconds),
        ];
        for (key, value) in timeouts {
            if value == 0 {
                return Err(AppError::configuration(format!("{key} must be positive")));
            }
        }

        for (key, url) in [
            ("endoflife.base_url", &self.endoflife.base_url),
            ("telegram.base_url", &self.telegram.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::configuration(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }
}
