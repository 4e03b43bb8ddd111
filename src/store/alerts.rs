use chrono::Utc;

use super::{JobStore, StoreResult};
use crate::models::{AlertAuditRecord, AlertChannel, AlertStatus};
use crate::utils::MAX_PAGE_LIMIT;

impl JobStore {
    pub async fn insert_alert(
        &self,
        job_id: i64,
        channel: AlertChannel,
        status: AlertStatus,
        message: Option<&str>,
    ) -> StoreResult<AlertAuditRecord> {
        let record = sqlx::query_as::<_, AlertAuditRecord>(
            r#"
            INSERT INTO alert_logs (job_id, channel, status, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(channel)
        .bind(status)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Audit rows newest first
    pub async fn list_alerts(&self, limit: i64, offset: i64) -> StoreResult<Vec<AlertAuditRecord>> {
        let records = sqlx::query_as::<_, AlertAuditRecord>(
            "SELECT * FROM alert_logs ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit.clamp(1, MAX_PAGE_LIMIT))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn alerts_for_job(&self, job_id: i64) -> StoreResult<Vec<AlertAuditRecord>> {
        let records = sqlx::query_as::<_, AlertAuditRecord>(
            "SELECT * FROM alert_logs WHERE job_id = ? ORDER BY id ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
