//! # eolwatch-integration
//!
//! Clients for the services eolwatch talks to: the EOL data authority,
//! subscriber webhooks and the operator chat channel. Each client is built
//! once from configuration and shared behind the trait the scan engine and
//! handlers depend on.

pub mod endoflife;
pub mod error;
pub mod http;
pub mod telegram;
pub mod webhook;

pub use endoflife::{EndOfLifeClient, EolGateway};
pub use error::IntegrationError;
pub use telegram::{ChatChannel, TelegramClient};
pub use webhook::{DeliveryResult, Notifier, WebhookDispatcher};
