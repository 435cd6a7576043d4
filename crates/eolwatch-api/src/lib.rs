//! # eolwatch-api
//!
//! HTTP surface for eolwatch built on Axum: subscription intake, the
//! authenticated callback, service metadata, health and the tracked
//! technology listing. Errors leave as JSON bodies with an `error` field.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
