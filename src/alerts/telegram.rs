//! Chat channel over the Telegram Bot API `sendMessage` endpoint

use async_trait::async_trait;
use tracing::{debug, info};

use super::{JobAlert, Notifier, NotifyError};
use crate::config::ChatConfig;
use crate::models::AlertChannel;
use crate::utils::{CHAT_AUDIT_MESSAGE_CHARS, safe_truncate_chars};

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    endpoint: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// `Ok(None)` unless the channel is enabled with a token and chat id
    pub fn from_config(config: &ChatConfig) -> Result<Option<Self>, NotifyError> {
        let Some((token, chat_id)) = config.destination() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Some(Self {
            endpoint: format!(
                "{}/bot{token}/sendMessage",
                config.api_base.trim_end_matches('/')
            ),
            chat_id: chat_id.to_string(),
            client,
        }))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Chat
    }

    async fn send(&self, alert: &JobAlert) -> Result<String, NotifyError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": alert.chat_text,
            "parse_mode": "HTML",
        });

        debug!(chat_id = %self.chat_id, job_id = alert.job_id, "Sending chat alert");

        // The endpoint URL embeds the bot token; keep it out of error text
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let summary = safe_truncate_chars(&alert.chat_plain, CHAT_AUDIT_MESSAGE_CHARS).to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                summary,
            });
        }

        info!(channel = "chat", job_id = alert.job_id, "Alert delivered");
        Ok(summary)
    }
}
