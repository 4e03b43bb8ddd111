//! Cron trigger for the fixed scheduled query

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};

use crate::browser::DriverFactory;
use crate::config::ScheduleConfig;
use crate::pipeline::Pipeline;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid cron expression {expr:?}: {source}")]
    InvalidCron {
        expr: String,
        #[source]
        source: JobSchedulerError,
    },

    #[error("scheduler failure: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

/// Owns the cron scheduler. `start` is idempotent; the first call wins.
pub struct ScrapeScheduler<F: DriverFactory + 'static> {
    pipeline: Arc<Pipeline<F>>,
    schedule: ScheduleConfig,
    running: Mutex<Option<JobScheduler>>,
}

impl<F: DriverFactory + 'static> ScrapeScheduler<F> {
    pub fn new(pipeline: Arc<Pipeline<F>>, schedule: ScheduleConfig) -> Self {
        Self {
            pipeline,
            schedule,
            running: Mutex::new(None),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Register the scrape job and start ticking. Returns `false` when the
    /// scheduler was already started.
    pub async fn start(&self) -> Result<bool, SchedulerError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Ok(false);
        }

        let cron = normalize_cron(&self.schedule.cron);
        let pipeline = Arc::clone(&self.pipeline);
        let schedule = self.schedule.clone();

        let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
            let pipeline = Arc::clone(&pipeline);
            let schedule = schedule.clone();
            Box::pin(async move {
                info!(keywords = %schedule.keywords, location = %schedule.location, "Scheduled scrape starting");
                if let Err(e) = pipeline
                    .run_pipeline(&schedule.keywords, &schedule.location, schedule.max_pages)
                    .await
                {
                    error!("Scheduled scrape failed: {e}");
                }
            })
        })
        .map_err(|source| SchedulerError::InvalidCron {
            expr: self.schedule.cron.clone(),
            source,
        })?;

        let scheduler = JobScheduler::new().await?;
        scheduler.add(job).await?;
        scheduler.start().await?;

        info!(cron = %cron, "Scheduler started");
        *running = Some(scheduler);
        Ok(true)
    }

    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        if let Some(mut scheduler) = self.running.lock().await.take() {
            scheduler.shutdown().await?;
            info!("Scheduler stopped");
        }
        Ok(())
    }
}

/// Accept classic 5-field crontab lines by prepending a seconds field.
#[must_use]
pub fn normalize_cron(expr: &str) -> String {
    let expr = expr.trim();
    if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_field_gets_seconds() {
        assert_eq!(normalize_cron("0 8 * * *"), "0 0 8 * * *");
        assert_eq!(normalize_cron(" 0 0 8 * * MON "), "0 0 8 * * MON");
    }
}
