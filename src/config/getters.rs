//! Accessors for `ScrapeSessionConfig`

use std::path::Path;
use std::time::Duration;

use super::types::{PaginationMode, ScrapeSessionConfig};

impl ScrapeSessionConfig {
    #[must_use]
    pub fn delay_bounds(&self) -> (f64, f64) {
        (self.delay_min_secs, self.delay_max_secs)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationMode {
        self.pagination
    }

    #[must_use]
    pub fn enrich_details(&self) -> bool {
        self.enrich_details
    }

    #[must_use]
    pub fn card_wait_timeout(&self) -> Duration {
        self.card_wait_timeout
    }

    #[must_use]
    pub fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    /// Copy of this config with a different page cap, for per-trigger overrides
    #[must_use]
    pub fn with_max_pages(&self, max_pages: u32) -> Self {
        let mut next = self.clone();
        next.max_pages = max_pages.max(1);
        next
    }
}
