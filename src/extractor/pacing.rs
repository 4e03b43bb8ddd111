use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::ScrapeSessionConfig;
use crate::utils::MAX_DELAY_SECS;

/// Randomized delays between browser actions.
///
/// The target rate-limits bursty clients, so every page load and detail
/// visit is followed by a uniform delay within the configured bounds.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min_secs: f64,
    max_secs: f64,
}

impl Pacer {
    #[must_use]
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        let min_secs = min_secs.max(0.0);
        Self {
            min_secs,
            max_secs: max_secs.max(min_secs),
        }
    }

    #[must_use]
    pub fn from_config(config: &ScrapeSessionConfig) -> Self {
        let (min, max) = config.delay_bounds();
        Self::new(min, max)
    }

    /// No delays at all; for tests and fixtures
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Delay between navigations
    pub fn page_delay(&self) -> Duration {
        sample(self.min_secs, self.max_secs)
    }

    /// Shorter delay between scroll steps
    pub fn scroll_delay(&self) -> Duration {
        sample(self.min_secs / 3.0, self.max_secs / 2.0)
    }

    /// Sleep for a page delay. Returns `false` if cancelled meanwhile.
    pub async fn pause(&self, cancel: &CancellationToken) -> bool {
        sleep_unless_cancelled(self.page_delay(), cancel).await
    }

    pub async fn pause_scroll(&self, cancel: &CancellationToken) -> bool {
        sleep_unless_cancelled(self.scroll_delay(), cancel).await
    }
}

fn sample(min: f64, max: f64) -> Duration {
    if max <= 0.0 {
        return Duration::ZERO;
    }
    let secs = if max > min {
        rand::rng().random_range(min..=max)
    } else {
        max
    };
    Duration::try_from_secs_f64(secs.min(MAX_DELAY_SECS)).unwrap_or(Duration::ZERO)
}

async fn sleep_unless_cancelled(delay: Duration, cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    if delay.is_zero() {
        return true;
    }
    tokio::select! {
        () = tokio::time::sleep(delay) => true,
        () = cancel.cancelled() => false,
    }
}
