//! Request handlers grouped by resource.

pub mod callback;
pub mod health;
pub mod meta;
pub mod subscription;
