//! CLI command definitions and dispatch.

pub mod migrate;
pub mod scan;
pub mod subscribe;
pub mod technologies;

use clap::{Parser, Subcommand};

use eolwatch_core::config::{AppConfig, StoreProvider};
use eolwatch_core::error::AppError;
use eolwatch_database::StoreManager;

use crate::output::{self, OutputFormat};

/// eolwatch: end-of-life notifications for the software you run
#[derive(Debug, Parser)]
#[command(name = "eolwatch", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment; selects `config/{env}.toml`
    #[arg(short, long, env = "EOLWATCH_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Run one expiration scan now
    Scan(scan::ScanArgs),
    /// List tracked technology/version pairs
    Technologies(technologies::TechnologiesArgs),
    /// Store a new subscription
    Subscribe(subscribe::SubscribeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Scan(args) => scan::execute(args, &config, self.format).await,
            Commands::Technologies(args) => {
                technologies::execute(args, &config, self.format).await
            }
            Commands::Subscribe(args) => subscribe::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: open the configured store, warning when it is process-local
pub async fn open_store(config: &AppConfig) -> Result<StoreManager, AppError> {
    if config.database.provider == StoreProvider::Memory {
        output::print_warning(
            "database.provider is 'memory'; this command sees an empty store that vanishes on exit",
        );
    }
    StoreManager::new(&config.database).await
}
