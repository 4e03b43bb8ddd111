//! Search result extraction.
//!
//! One [`Extractor::collect`] call walks the result pages for a query and
//! returns the cards it could resolve to a link, in first-seen order with
//! duplicate links removed. Nothing here returns an error: a page that fails
//! to load or never shows cards ends pagination, and a card field that fails
//! to read is recorded as [`FieldRead::Faulted`].

mod cards;
mod pacing;
mod record;
mod scroll;

pub use pacing::Pacer;
pub use record::{Enrichment, FieldRead, JobDetails, RawListingRecord};

pub(crate) use scroll::settle_scroll;

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::browser::PageDriver;
use crate::config::{PaginationMode, ScrapeSessionConfig};
use crate::utils::{
    CARD_SELECTOR, NEXT_PAGE_SELECTOR, RESULTS_PER_PAGE, RESULTS_SCROLL_STEPS,
    build_search_url_with_base,
};

/// Why pagination ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    MaxPages,
    /// The wait for result cards timed out
    NoResults,
    /// Cards were present but none could be read
    EmptyPage,
    /// `NextControl` mode found no enabled next button
    NoNextPage,
    Cancelled,
    /// Navigation or query failure at page level
    PageFault(String),
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub records: Vec<RawListingRecord>,
    pub pages_visited: u32,
    pub stop: StopReason,
}

pub struct Extractor<'a, D: PageDriver + ?Sized> {
    driver: &'a mut D,
    config: &'a ScrapeSessionConfig,
    pacer: Pacer,
    cancel: CancellationToken,
}

impl<'a, D: PageDriver + ?Sized> Extractor<'a, D> {
    pub fn new(driver: &'a mut D, config: &'a ScrapeSessionConfig) -> Self {
        Self {
            driver,
            config,
            pacer: Pacer::from_config(config),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Collect listings for `(keywords, location)` up to the configured page
    /// cap.
    pub async fn collect(&mut self, keywords: &str, location: &str) -> ExtractionOutcome {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut pages_visited = 0;
        let max_pages = self.config.max_pages();
        let mode = self.config.pagination();

        let stop = loop {
            if pages_visited >= max_pages {
                break StopReason::MaxPages;
            }
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            // Offset mode loads every page by URL; next-control mode only the first
            if pages_visited == 0 || mode == PaginationMode::Offset {
                let start = pages_visited * RESULTS_PER_PAGE;
                if let Err(reason) = self.open_results_page(keywords, location, start).await {
                    break StopReason::PageFault(reason);
                }
            }
            pages_visited += 1;

            match self
                .driver
                .wait_for_selector(CARD_SELECTOR, self.config.card_wait_timeout())
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    debug!(page = pages_visited, "No result cards before timeout");
                    break StopReason::NoResults;
                }
                Err(e) => break StopReason::PageFault(e.to_string()),
            }

            if let Err(e) =
                settle_scroll(&mut *self.driver, RESULTS_SCROLL_STEPS, &self.pacer, &self.cancel)
                    .await
            {
                debug!(page = pages_visited, "Scroll settling failed: {e}");
            }

            let batch = match cards::collect_cards(&mut *self.driver, keywords).await {
                Ok(batch) => batch,
                Err(e) => break StopReason::PageFault(e.to_string()),
            };
            if batch.is_empty() {
                break StopReason::EmptyPage;
            }

            let before = records.len();
            for record in batch {
                if seen.insert(record.source_link.clone()) {
                    records.push(record);
                }
            }
            info!(
                page = pages_visited,
                new = records.len() - before,
                total = records.len(),
                "Collected result page"
            );

            if pages_visited >= max_pages {
                break StopReason::MaxPages;
            }

            if mode == PaginationMode::NextControl {
                match self.click_next().await {
                    Ok(true) => {}
                    Ok(false) => break StopReason::NoNextPage,
                    Err(reason) => break StopReason::PageFault(reason),
                }
            }

            if !self.pacer.pause(&self.cancel).await {
                break StopReason::Cancelled;
            }
        };

        if let StopReason::PageFault(reason) = &stop {
            warn!(page = pages_visited, "Pagination ended on page fault: {reason}");
        }
        info!(
            keywords,
            location,
            pages = pages_visited,
            found = records.len(),
            stop = ?stop,
            "Extraction finished"
        );

        ExtractionOutcome {
            records,
            pages_visited,
            stop,
        }
    }

    async fn open_results_page(
        &mut self,
        keywords: &str,
        location: &str,
        start: u32,
    ) -> Result<(), String> {
        let url = build_search_url_with_base(self.config.search_endpoint(), keywords, location, start)
            .map_err(|e| format!("invalid search endpoint: {e}"))?;
        self.driver
            .navigate(url.as_str())
            .await
            .map_err(|e| e.to_string())
    }

    /// Activate the next-page control. `Ok(false)` when it is missing or
    /// disabled.
    async fn click_next(&mut self) -> Result<bool, String> {
        let buttons = self
            .driver
            .find_all(NEXT_PAGE_SELECTOR)
            .await
            .map_err(|e| e.to_string())?;
        let Some(&button) = buttons.first() else {
            return Ok(false);
        };

        let disabled = self
            .driver
            .read_attribute(button, "disabled")
            .await
            .map_err(|e| e.to_string())?
            .is_some();
        let aria_disabled = self
            .driver
            .read_attribute(button, "aria-disabled")
            .await
            .map_err(|e| e.to_string())?
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        if disabled || aria_disabled {
            return Ok(false);
        }

        self.driver.click(button).await.map_err(|e| e.to_string())?;
        Ok(true)
    }
}
