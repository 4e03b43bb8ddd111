use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{JobFilter, JobStore, StoreResult};
use crate::models::{JobPosting, NewJobPosting};

impl JobStore {
    /// Insert unless a posting with the same `source_link` exists.
    ///
    /// Returns `Ok(None)` for an existing link, including when another
    /// writer inserted it between our check and our write.
    pub async fn insert_if_absent(&self, job: &NewJobPosting) -> StoreResult<Option<JobPosting>> {
        let created = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO jobs (
                title, company, location, posted_date, source_link,
                experience_level, employment_type, keyword_tag, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(source_link) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(job.title_text())
        .bind(job.company_name())
        .bind(job.location_name())
        .bind(job.posted())
        .bind(job.source_link())
        .bind(job.experience())
        .bind(job.employment())
        .bind(job.keyword())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn exists(&self, source_link: &str) -> StoreResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM jobs WHERE source_link = ?")
            .bind(source_link)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<JobPosting>> {
        let job = sqlx::query_as::<_, JobPosting>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<JobPosting>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM jobs");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY ")
            .push(filter.sort().to_sql())
            .push(" LIMIT ")
            .push_bind(filter.effective_limit())
            .push(" OFFSET ")
            .push_bind(filter.effective_offset());

        let jobs = qb.build_query_as::<JobPosting>().fetch_all(&self.pool).await?;
        Ok(jobs)
    }

    /// Number of postings matching the filter, ignoring paging and order
    pub async fn count(&self, filter: &JobFilter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs");
        filter.push_where(&mut qb);
        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }
}
