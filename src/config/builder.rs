//! Validating builder for `ScrapeSessionConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::{ConfigError, PaginationMode, ScrapeSessionConfig};
use crate::utils::{CARD_WAIT_TIMEOUT_SECS, MAX_DELAY_SECS, SEARCH_ENDPOINT};

pub struct ScrapeSessionConfigBuilder {
    delay_min_secs: f64,
    delay_max_secs: f64,
    headless: bool,
    proxy: Option<String>,
    max_pages: u32,
    chrome_executable: Option<PathBuf>,
    user_agent: Option<String>,
    pagination: PaginationMode,
    enrich_details: bool,
    card_wait_timeout: Duration,
    search_endpoint: String,
}

impl Default for ScrapeSessionConfigBuilder {
    fn default() -> Self {
        Self {
            delay_min_secs: 2.0,
            delay_max_secs: 5.0,
            headless: true,
            proxy: None,
            max_pages: 10,
            chrome_executable: None,
            user_agent: None,
            pagination: PaginationMode::Offset,
            enrich_details: false,
            card_wait_timeout: Duration::from_secs(CARD_WAIT_TIMEOUT_SECS),
            search_endpoint: SEARCH_ENDPOINT.to_string(),
        }
    }
}

impl ScrapeSessionConfig {
    /// Create a builder with production defaults
    #[must_use]
    pub fn builder() -> ScrapeSessionConfigBuilder {
        ScrapeSessionConfigBuilder::default()
    }
}

impl Default for ScrapeSessionConfig {
    fn default() -> Self {
        let b = ScrapeSessionConfigBuilder::default();
        Self {
            delay_min_secs: b.delay_min_secs,
            delay_max_secs: b.delay_max_secs,
            headless: b.headless,
            proxy: b.proxy,
            max_pages: b.max_pages,
            chrome_executable: b.chrome_executable,
            user_agent: b.user_agent,
            pagination: b.pagination,
            enrich_details: b.enrich_details,
            card_wait_timeout: b.card_wait_timeout,
            search_endpoint: b.search_endpoint,
        }
    }
}

impl ScrapeSessionConfigBuilder {
    /// Uniform pacing bounds in seconds between page loads and detail visits
    #[must_use]
    pub fn pacing(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.delay_min_secs = min_secs;
        self.delay_max_secs = max_secs;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Skip executable discovery and launch this binary
    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    /// Pin the user agent instead of drawing one from the pool
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    #[must_use]
    pub fn pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    #[must_use]
    pub fn enrich_details(mut self, enrich: bool) -> Self {
        self.enrich_details = enrich;
        self
    }

    #[must_use]
    pub fn card_wait_timeout(mut self, timeout: Duration) -> Self {
        self.card_wait_timeout = timeout;
        self
    }

    #[must_use]
    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Fails when the pacing bounds are negative, inverted, not finite or above
    /// an hour, or
    /// when `max_pages` is zero.
    pub fn build(self) -> Result<ScrapeSessionConfig, ConfigError> {
        let (min, max) = (self.delay_min_secs, self.delay_max_secs);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max || max > MAX_DELAY_SECS {
            return Err(ConfigError::PacingBounds { min, max });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroPages);
        }

        Ok(ScrapeSessionConfig {
            delay_min_secs: min,
            delay_max_secs: max,
            headless: self.headless,
            proxy: self.proxy.filter(|p| !p.trim().is_empty()),
            max_pages: self.max_pages,
            chrome_executable: self.chrome_executable,
            user_agent: self.user_agent,
            pagination: self.pagination,
            enrich_details: self.enrich_details,
            card_wait_timeout: self.card_wait_timeout,
            search_endpoint: self.search_endpoint,
        })
    }
}
