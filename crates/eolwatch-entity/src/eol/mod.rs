//! End-of-life facts and the notices derived from them.

pub mod fact;
pub mod notice;

pub use fact::{EolFact, EolStatus, LifecycleDate, days_until};
pub use notice::EolNotice;
