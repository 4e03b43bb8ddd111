pub mod alerts;
pub mod api;
pub mod browser;
pub mod browser_setup;
pub mod config;
pub mod enricher;
pub mod export;
pub mod extractor;
pub mod ingest;
pub mod kromekover;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod store;
pub mod utils;

pub use alerts::{AlertDispatcher, JobAlert, Notifier, NotifyError};
pub use api::{AppState, build_router};
pub use browser::{ChromiumLauncher, DriverError, DriverFactory, PageDriver};
pub use config::{AppConfig, ConfigError, PaginationMode, ScrapeSessionConfig};
pub use models::{AlertAuditRecord, AlertChannel, AlertStatus, JobPosting, NewJobPosting};
pub use pipeline::{Pipeline, PipelineError, RunSummary};
pub use scheduler::ScrapeScheduler;
pub use store::{JobFilter, JobStore, StoreError};
