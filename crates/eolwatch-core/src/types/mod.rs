//! Core type definitions used across the eolwatch workspace.

pub mod id;

pub use id::*;
