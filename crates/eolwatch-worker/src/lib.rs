//! Scheduled work for eolwatch.
//!
//! This crate provides:
//! - The expiration scan engine that matches live EOL data against
//!   subscription windows and drives webhook delivery
//! - A cron scheduler that runs the scan without overlapping cycles

pub mod jobs;
pub mod report;
pub mod scheduler;

pub use jobs::{ExpirationScanJob, ScanSettings};
pub use report::ScanReport;
pub use scheduler::CronScheduler;
