use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, warn};

use super::{EmailNotifier, JobAlert, Notifier, NotifyError, TelegramNotifier};
use crate::config::{ChatConfig, EmailConfig};
use crate::models::{AlertAuditRecord, AlertChannel, AlertStatus, JobPosting};
use crate::store::JobStore;

/// Sends alerts on every configured channel and audits each attempt
#[derive(Clone)]
pub struct AlertDispatcher {
    store: JobStore,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl AlertDispatcher {
    pub fn new(store: JobStore, notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { store, notifiers }
    }

    /// Build the channels whose configuration is complete
    pub fn from_config(
        store: JobStore,
        email: &EmailConfig,
        chat: &ChatConfig,
    ) -> Result<Self, NotifyError> {
        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
        match EmailNotifier::from_config(email) {
            Some(n) => notifiers.push(Arc::new(n)),
            None => debug!("Email channel disabled or incomplete"),
        }
        match TelegramNotifier::from_config(chat)? {
            Some(n) => notifiers.push(Arc::new(n)),
            None => debug!("Chat channel disabled or incomplete"),
        }
        Ok(Self::new(store, notifiers))
    }

    pub fn channels(&self) -> Vec<AlertChannel> {
        self.notifiers.iter().map(|n| n.channel()).collect()
    }

    /// Attempt every channel for `posting` independently.
    ///
    /// Never fails: delivery errors become `failed` audit rows, and an audit
    /// write that itself fails is logged and skipped. Returns the rows
    /// written.
    pub async fn dispatch(&self, posting: &JobPosting) -> Vec<AlertAuditRecord> {
        let alert = JobAlert::for_posting(posting);
        let attempts = self.notifiers.iter().map(|notifier| {
            let alert = &alert;
            async move {
                let channel = notifier.channel();
                let (status, message) = match notifier.send(alert).await {
                    Ok(message) => (AlertStatus::Sent, message),
                    Err(e) => {
                        warn!(%channel, job_id = alert.job_id, "Alert delivery failed: {e}");
                        (AlertStatus::Failed, e.audit_message())
                    }
                };
                self.audit(alert.job_id, channel, status, &message).await
            }
        });

        join_all(attempts).await.into_iter().flatten().collect()
    }

    async fn audit(
        &self,
        job_id: i64,
        channel: AlertChannel,
        status: AlertStatus,
        message: &str,
    ) -> Option<AlertAuditRecord> {
        match self
            .store
            .insert_alert(job_id, channel, status, Some(message))
            .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                error!(%channel, job_id, "Failed to write alert audit row: {e}");
                None
            }
        }
    }
}
