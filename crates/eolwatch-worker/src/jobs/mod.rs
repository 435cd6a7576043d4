//! Job implementations.

pub mod expiration;

pub use expiration::{ExpirationScanJob, ScanSettings};
