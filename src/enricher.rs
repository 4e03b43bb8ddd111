//! Optional detail-page stage.
//!
//! Visits each record's link and fills [`Enrichment`]. A failure on one
//! posting is stored on that record as [`Enrichment::Failed`] and the batch
//! moves on.

use scraper::{ElementRef, Html, Selector};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::browser::{DriverError, DriverResult, PageDriver};
use crate::config::ScrapeSessionConfig;
use crate::extractor::{Enrichment, JobDetails, Pacer, RawListingRecord, settle_scroll};
use crate::utils::{CRITERIA_SELECTOR, DESCRIPTION_SELECTORS, DETAIL_SCROLL_STEPS, EMPLOYMENT_TYPES, clean_text};

const SENIORITY_HEADER: &str = "Seniority level";

pub struct DetailEnricher<'a, D: PageDriver + ?Sized> {
    driver: &'a mut D,
    config: &'a ScrapeSessionConfig,
    pacer: Pacer,
    cancel: CancellationToken,
}

impl<'a, D: PageDriver + ?Sized> DetailEnricher<'a, D> {
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

    /// Enrich records in order. Returns how many were enriched; records left
    /// after a cancellation stay `NotAttempted`.
    pub async fn enrich_all(&mut self, records: &mut [RawListingRecord]) -> usize {
        let mut enriched = 0;
        for (index, record) in records.iter_mut().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }
            if index > 0 && !self.pacer.pause(&self.cancel).await {
                break;
            }
            self.enrich(record).await;
            if matches!(record.enrichment, Enrichment::Enriched(_)) {
                enriched += 1;
            }
        }
        info!(enriched, total = records.len(), "Detail enrichment finished");
        enriched
    }

    pub async fn enrich(&mut self, record: &mut RawListingRecord) {
        record.enrichment = match self.fetch_details(&record.source_link).await {
            Ok(details) => Enrichment::Enriched(details),
            Err(e) => {
                warn!(link = %record.source_link, "Detail enrichment failed: {e}");
                Enrichment::Failed(e.to_string())
            }
        };
    }

    async fn fetch_details(&mut self, link: &str) -> DriverResult<JobDetails> {
        self.driver.navigate(link).await?;
        if !self
            .driver
            .wait_for_selector("body", self.config.card_wait_timeout())
            .await?
        {
            return Err(DriverError::Query {
                selector: "body".to_string(),
                reason: "timed out waiting for detail page".to_string(),
            });
        }
        self.pacer.pause(&self.cancel).await;
        if let Err(e) =
            settle_scroll(&mut *self.driver, DETAIL_SCROLL_STEPS, &self.pacer, &self.cancel).await
        {
            debug!(link, "Detail scroll failed: {e}");
        }
        let html = self.driver.content().await?;
        Ok(parse_details(&html))
    }
}

/// Extract description, criteria and inferred tags from detail page HTML
#[must_use]
pub fn parse_details(html: &str) -> JobDetails {
    let document = Html::parse_document(html);

    let description = DESCRIPTION_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|sel| document.select(&sel).next());

    let description_text = description.and_then(|el| {
        let text = text_lines(el).join("\n");
        (!text.is_empty()).then_some(text)
    });

    let mut criteria = Vec::new();
    let mut experience_level = None;
    if let Ok(item_sel) = Selector::parse(CRITERIA_SELECTOR) {
        for item in document.select(&item_sel) {
            let parts = text_lines(item);
            if parts.is_empty() {
                continue;
            }
            if experience_level.is_none()
                && parts[0].eq_ignore_ascii_case(SENIORITY_HEADER)
                && parts.len() > 1
            {
                experience_level = clean_text(&parts[1..].join(" "));
            }
            criteria.push(parts.join(" "));
        }
    }

    JobDetails {
        employment_type: description_text
            .as_deref()
            .and_then(infer_employment_type)
            .map(str::to_string),
        description_html: description.map(|el| el.html()),
        description_text,
        criteria,
        experience_level,
    }
}

fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    el.text().filter_map(clean_text).collect()
}

/// First employment type mentioned in `text`, case-insensitively
#[must_use]
pub fn infer_employment_type(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    EMPLOYMENT_TYPES
        .iter()
        .copied()
        .find(|kind| lower.contains(&kind.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_HTML: &str = r#"
        <html><body>
          <div class="show-more-less-html__markup">Fallback text</div>
          <div class="description__text">
            <p>We are hiring a <b>part-time</b> backend engineer.</p>
            <p>Contract extension possible.</p>
          </div>
          <ul>
            <li class="description__job-criteria-item">
              <h3>Seniority level</h3><span> Mid-Senior level </span>
            </li>
            <li class="description__job-criteria-item">
              <h3>Employment type</h3><span>Part-time</span>
            </li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn primary_description_and_criteria() {
        let details = parse_details(DETAIL_HTML);
        let text = details.description_text.unwrap();
        assert!(text.starts_with("We are hiring a"));
        assert!(!text.contains("Fallback"));
        assert_eq!(
            details.criteria,
            vec![
                "Seniority level Mid-Senior level".to_string(),
                "Employment type Part-time".to_string()
            ]
        );
        assert_eq!(details.experience_level.as_deref(), Some("Mid-Senior level"));
        assert!(details.description_html.unwrap().contains("description__text"));
    }

    #[test]
    fn fallback_description_selector() {
        let details = parse_details(
            r#"<div class="show-more-less-html__markup">Temporary role</div>"#,
        );
        assert_eq!(details.description_text.as_deref(), Some("Temporary role"));
        assert_eq!(details.employment_type.as_deref(), Some("Temporary"));
        assert!(details.criteria.is_empty());
    }

    #[test]
    fn employment_type_follows_vocabulary_order() {
        // Both appear; the vocabulary order decides, not the text order
        assert_eq!(
            infer_employment_type("contract or full-time"),
            Some("Full-time")
        );
        assert_eq!(infer_employment_type("INTERNSHIP"), Some("Internship"));
        assert_eq!(infer_employment_type("permanent"), None);
    }

    #[test]
    fn missing_description() {
        let details = parse_details("<html><body><p>nothing</p></body></html>");
        assert_eq!(details, JobDetails::default());
    }
}
