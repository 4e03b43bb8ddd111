use std::sync::Arc;

use jobwatch::alerts::AlertDispatcher;
use jobwatch::config::{PaginationMode, ScheduleConfig};
use jobwatch::pipeline::Pipeline;
use jobwatch::scheduler::{SchedulerError, ScrapeScheduler};
use jobwatch::store::JobStore;

mod common;
use common::{FakeFactory, FakeSite, fast_config};

async fn pipeline() -> Arc<Pipeline<FakeFactory>> {
    let store = JobStore::open_in_memory().await.unwrap();
    Arc::new(Pipeline::new(
        FakeFactory::new(FakeSite::default()),
        store.clone(),
        AlertDispatcher::new(store, Vec::new()),
        fast_config(1, PaginationMode::Offset),
    ))
}

#[tokio::test]
async fn start_is_idempotent() {
    let scheduler = ScrapeScheduler::new(pipeline().await, ScheduleConfig::default());

    assert!(scheduler.start().await.unwrap());
    assert!(!scheduler.start().await.unwrap());
    assert!(scheduler.is_running().await);

    scheduler.shutdown().await.unwrap();
    assert!(!scheduler.is_running().await);
}

#[tokio::test]
async fn invalid_cron_is_reported() {
    let schedule = ScheduleConfig {
        cron: "every morning".to_string(),
        ..ScheduleConfig::default()
    };
    let scheduler = ScrapeScheduler::new(pipeline().await, schedule);

    let err = scheduler.start().await.unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidCron { .. }));
    assert!(!scheduler.is_running().await);
}
