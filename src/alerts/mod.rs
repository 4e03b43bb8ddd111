//! Alert delivery for newly stored postings.
//!
//! Each configured channel is a [`Notifier`]. The [`AlertDispatcher`] tries
//! every channel for a posting and writes exactly one audit row per attempt.
//! A channel whose configuration is incomplete is never constructed, so it
//! neither sends nor audits.

mod dispatcher;
mod email;
mod message;
mod telegram;

pub use dispatcher::AlertDispatcher;
pub use email::EmailNotifier;
pub use message::JobAlert;
pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::models::AlertChannel;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat endpoint returned {status}")]
    Rejected { status: u16, summary: String },

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    /// Text stored in the audit row for this failure
    #[must_use]
    pub fn audit_message(&self) -> String {
        match self {
            Self::Rejected { summary, .. } => summary.clone(),
            other => other.to_string(),
        }
    }
}

/// One delivery channel
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> AlertChannel;

    /// Deliver the alert. On success returns the text to audit.
    async fn send(&self, alert: &JobAlert) -> Result<String, NotifyError>;
}
