//! SQLite persistence for postings and the alert audit log.
//!
//! The store owns the only uniqueness guarantee the pipeline relies on:
//! `jobs.source_link` carries a `UNIQUE` constraint and inserts use
//! `ON CONFLICT DO NOTHING`, so concurrent runs racing on the same link
//! resolve to exactly one row without an application-level lock.

mod alerts;
mod filter;
mod jobs;
mod suggest;

pub use filter::{JobFilter, SortKey, SortOrder};
pub use suggest::Suggestions;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

/// SQL schema, applied on every open
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    company TEXT,
    location TEXT,
    posted_date TEXT,
    source_link TEXT NOT NULL UNIQUE,
    experience_level TEXT,
    employment_type TEXT,
    keyword_tag TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
CREATE INDEX IF NOT EXISTS idx_jobs_posted_date ON jobs(posted_date);
CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs(company);

-- One row per delivery attempt, removed together with its posting
CREATE TABLE IF NOT EXISTS alert_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
    channel TEXT NOT NULL CHECK (channel IN ('email', 'chat')),
    status TEXT NOT NULL CHECK (status IN ('sent', 'failed')),
    message TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_alert_logs_job ON alert_logs(job_id);
CREATE INDEX IF NOT EXISTS idx_alert_logs_created_at ON alert_logs(created_at);
"#;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid database url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to initialize database schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the job database. Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    /// Open (creating if missing) the database at `database_url`, e.g.
    /// `sqlite://jobs.db`, and apply the schema.
    pub async fn open(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|source| StoreError::InvalidUrl {
                url: database_url.to_string(),
                source,
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same database.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .map_err(StoreError::Schema)?;
        tracing::debug!("job store schema ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
