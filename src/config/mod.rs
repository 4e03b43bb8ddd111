//! Configuration for scrape sessions and the running service
//!
//! `ScrapeSessionConfig` is built per run through a validating builder.
//! `AppConfig` is materialised once from the environment at process start.

pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

pub use builder::ScrapeSessionConfigBuilder;
pub use types::{
    AppConfig, ChatConfig, ConfigError, EmailConfig, EmailCredentials, PaginationMode,
    ScheduleConfig, ScrapeSessionConfig,
};
