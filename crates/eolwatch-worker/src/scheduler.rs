//! Cron scheduler for the expiration scan.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{info, warn};

use eolwatch_core::error::AppError;
use eolwatch_core::result::AppResult;

use crate::jobs::ExpirationScanJob;

/// Cron-based scheduler that never runs two scan cycles at once.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Held for the duration of a cycle
    cycle_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            cycle_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Register the expiration scan on `schedule` (6-field cron, seconds first).
    ///
    /// A tick that fires while the previous cycle is still running is
    /// skipped.
    pub async fn register_expiration_scan(
        &self,
        job: Arc<ExpirationScanJob>,
        schedule: &str,
    ) -> AppResult<()> {
        let cycle_lock = Arc::clone(&self.cycle_lock);
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            let cycle_lock = Arc::clone(&cycle_lock);
            Box::pin(async move {
                let Ok(_guard) = cycle_lock.try_lock_owned() else {
                    warn!("Previous scan cycle still running; skipping this tick");
                    return;
                };
                job.run_cycle(Utc::now()).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid scan schedule '{schedule}': {e}"))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add expiration scan schedule: {e}"))
        })?;

        info!(schedule, "Registered: expiration_scan");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Stop firing new ticks and wait for a running cycle to finish.
    pub async fn shutdown(&self) -> AppResult<()> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        let _idle = self.cycle_lock.lock().await;
        info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_idle_scheduler_has_free_cycle_lock() {
        let scheduler = CronScheduler::new().await.unwrap();
        assert!(scheduler.cycle_lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_held_lock_blocks_overlapping_cycle() {
        let scheduler = CronScheduler::new().await.unwrap();
        let _guard = Arc::clone(&scheduler.cycle_lock).try_lock_owned().unwrap();
        assert!(Arc::clone(&scheduler.cycle_lock).try_lock_owned().is_err());
    }
}
