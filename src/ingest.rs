//! Idempotent ingestion of validated postings

use tracing::{debug, info, warn};

use crate::extractor::RawListingRecord;
use crate::models::{JobPosting, NewJobPosting};
use crate::store::{JobStore, StoreResult};

#[derive(Clone, Debug)]
pub struct IngestionPipeline {
    store: JobStore,
}

impl IngestionPipeline {
    pub fn new(store: JobStore) -> Self {
        Self { store }
    }

    /// Persist `job` unless its link is already stored.
    ///
    /// `Ok(None)` means the posting was known, which is the normal steady
    /// state rather than an error.
    pub async fn ingest(&self, job: &NewJobPosting) -> StoreResult<Option<JobPosting>> {
        let created = self.store.insert_if_absent(job).await?;
        match &created {
            Some(posting) => debug!(job_id = posting.id, link = %posting.source_link, "Stored new posting"),
            None => debug!(link = %job.source_link(), "Posting already known"),
        }
        Ok(created)
    }

    /// Ingest in order, returning the newly created postings in the same
    /// order.
    ///
    /// A record the store refuses is logged and skipped so one bad row
    /// cannot cost the rest of the batch.
    pub async fn ingest_all<'a, I>(&self, jobs: I) -> IngestReport
    where
        I: IntoIterator<Item = &'a NewJobPosting>,
    {
        let mut report = IngestReport::default();
        let mut seen = 0usize;
        for job in jobs {
            seen += 1;
            match self.ingest(job).await {
                Ok(Some(posting)) => report.created.push(posting),
                Ok(None) => {}
                Err(e) => {
                    warn!(link = %job.source_link(), "Storing posting failed: {e}");
                    report.failed += 1;
                }
            }
        }
        info!(seen, created = report.created.len(), failed = report.failed, "Ingestion finished");
        report
    }
}

/// Outcome of [`IngestionPipeline::ingest_all`]
#[derive(Debug, Default)]
pub struct IngestReport {
    pub created: Vec<JobPosting>,
    pub failed: usize,
}

/// Validate extractor output, dropping (and logging) records that fail the
/// boundary checks.
pub fn validate_records(records: &[RawListingRecord]) -> Vec<NewJobPosting> {
    records
        .iter()
        .filter_map(|record| match record.to_new_posting() {
            Ok(job) => Some(job),
            Err(e) => {
                warn!(link = %record.source_link, "Rejected scraped record: {e}");
                None
            }
        })
        .collect()
}
