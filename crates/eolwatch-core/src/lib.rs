//! # eolwatch-core
//!
//! Core crate for eolwatch. Contains configuration schemas, typed
//! identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other eolwatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
