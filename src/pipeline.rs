//! Scrape, ingest, alert.
//!
//! [`Pipeline::run_pipeline`] is what both the cron trigger and the HTTP
//! trigger call. Runs for the same `(keywords, location)` are serialized;
//! runs for different queries proceed independently.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::alerts::AlertDispatcher;
use crate::browser::{DriverError, DriverFactory, PageDriver};
use crate::config::ScrapeSessionConfig;
use crate::enricher::DetailEnricher;
use crate::export::{export_base_name, export_records};
use crate::extractor::{ExtractionOutcome, Extractor, RawListingRecord};
use crate::ingest::{IngestReport, IngestionPipeline, validate_records};
use crate::store::JobStore;

/// Counts returned to triggers; partial failures still produce a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub found: usize,
    pub created: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("keywords must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    Browser(#[from] DriverError),
}

type FlightKey = (String, String);

pub struct Pipeline<F: DriverFactory> {
    factory: F,
    ingest: IngestionPipeline,
    dispatcher: AlertDispatcher,
    scrape: ScrapeSessionConfig,
    export_dir: Option<PathBuf>,
    deadline: Option<Duration>,
    flights: DashMap<FlightKey, Arc<Mutex<()>>>,
}

impl<F: DriverFactory> Pipeline<F> {
    pub fn new(
        factory: F,
        store: JobStore,
        dispatcher: AlertDispatcher,
        scrape: ScrapeSessionConfig,
    ) -> Self {
        Self {
            factory,
            ingest: IngestionPipeline::new(store),
            dispatcher,
            scrape,
            export_dir: None,
            deadline: None,
            flights: DashMap::new(),
        }
    }

    /// Also write CSV/JSON snapshots of every run into `dir`
    #[must_use]
    pub fn with_export_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.export_dir = dir;
        self
    }

    /// Cancel runs that take longer than `deadline`, keeping what they found
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn scrape_config(&self) -> &ScrapeSessionConfig {
        &self.scrape
    }

    pub async fn run_pipeline(
        &self,
        keywords: &str,
        location: &str,
        max_pages: u32,
    ) -> Result<RunSummary, PipelineError> {
        self.run_pipeline_with_cancel(keywords, location, max_pages, CancellationToken::new())
            .await
    }

    /// Run with an external cancellation token.
    ///
    /// Cancellation stops extraction and enrichment at the next check; the
    /// records collected so far are still ingested and alerted, and the
    /// browser is always closed.
    #[instrument(skip(self, cancel))]
    pub async fn run_pipeline_with_cancel(
        &self,
        keywords: &str,
        location: &str,
        max_pages: u32,
        cancel: CancellationToken,
    ) -> Result<RunSummary, PipelineError> {
        let keywords = keywords.trim();
        let location = location.trim();
        if keywords.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let key = (keywords.to_lowercase(), location.to_lowercase());
        let flight = self.flight(&key);
        let result = {
            let _guard = flight.lock().await;
            self.run_guarded(keywords, location, max_pages, &cancel).await
        };

        drop(flight);
        self.flights.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Number of queries with a run in progress or waiting
    pub fn in_flight_queries(&self) -> usize {
        self.flights.len()
    }

    async fn run_guarded(
        &self,
        keywords: &str,
        location: &str,
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, PipelineError> {
        let deadline_task = self.deadline.map(|deadline| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(?deadline, "Run deadline reached, cancelling");
                cancel.cancel();
            })
        });

        let result = self.run_locked(keywords, location, max_pages, cancel).await;

        if let Some(task) = deadline_task {
            task.abort();
        }
        result
    }

    async fn run_locked(
        &self,
        keywords: &str,
        location: &str,
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, PipelineError> {
        let config = self.scrape.with_max_pages(max_pages);
        let records = self.scrape_records(&config, keywords, location, cancel).await?;

        if let Some(dir) = &self.export_dir {
            self.export(dir.clone(), keywords, location, &records).await;
        }

        let valid = validate_records(&records);
        let IngestReport { created, failed } = self.ingest.ingest_all(&valid).await;
        for posting in &created {
            self.dispatcher.dispatch(posting).await;
        }

        let summary = RunSummary {
            found: records.len(),
            created: created.len(),
        };
        info!(
            keywords,
            location,
            found = summary.found,
            created = summary.created,
            failed,
            "Pipeline run finished"
        );
        Ok(summary)
    }

    /// Extract (and optionally enrich) with one driver, closing it on every
    /// path.
    async fn scrape_records(
        &self,
        config: &ScrapeSessionConfig,
        keywords: &str,
        location: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawListingRecord>, PipelineError> {
        let mut driver = self.factory.open(config).await?;

        let ExtractionOutcome { mut records, .. } = Extractor::new(&mut driver, config)
            .with_cancel(cancel.clone())
            .collect(keywords, location)
            .await;

        if config.enrich_details() && !cancel.is_cancelled() {
            DetailEnricher::new(&mut driver, config)
                .with_cancel(cancel.clone())
                .enrich_all(&mut records)
                .await;
        }

        if let Err(e) = driver.close().await {
            warn!("Closing browser failed: {e}");
        }
        Ok(records)
    }

    async fn export(&self, dir: PathBuf, keywords: &str, location: &str, records: &[RawListingRecord]) {
        let base = export_base_name(keywords, location);
        let records = records.to_vec();
        let result = tokio::task::spawn_blocking(move || {
            export_records(&dir, &base, &records, chrono::Utc::now())
        })
        .await;
        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Export failed: {e}"),
            Err(e) => warn!("Export task panicked: {e}"),
        }
    }

    fn flight(&self, key: &FlightKey) -> Arc<Mutex<()>> {
        self.flights
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
