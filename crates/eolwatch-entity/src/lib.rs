//! # eolwatch-entity
//!
//! Domain models for eolwatch. Stored records derive `sqlx::FromRow`;
//! every type that crosses a JSON boundary is parsed through
//! [`schema::Schema`].

pub mod chat;
pub mod eol;
pub mod schema;
pub mod subscription;
pub mod technology;

pub use schema::{Schema, SchemaError};
