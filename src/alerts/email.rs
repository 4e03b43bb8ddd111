//! SMTP email channel via `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{JobAlert, Notifier, NotifyError};
use crate::config::EmailConfig;
use crate::models::AlertChannel;

#[derive(Debug, Clone)]
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    use_tls: bool,
    sender: String,
    password: String,
    receiver: String,
}

impl EmailNotifier {
    /// `None` unless the channel is enabled and fully configured
    #[must_use]
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        let creds = config.credentials()?;
        Some(Self {
            smtp_server: config.smtp_server.clone(),
            smtp_port: config.smtp_port,
            use_tls: config.smtp_use_tls,
            sender: creds.sender.to_string(),
            password: creds.password.to_string(),
            receiver: creds.receiver.to_string(),
        })
    }

    /// STARTTLS when TLS is on, plain otherwise. Built per send, so a relay
    /// outage never leaves a stale pooled connection behind.
    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let builder = if self.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_server)
                .map_err(|e| NotifyError::Config(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.smtp_server)
        };
        Ok(builder
            .port(self.smtp_port)
            .credentials(Credentials::new(self.sender.clone(), self.password.clone()))
            .build())
    }

    fn compose(&self, alert: &JobAlert) -> Result<Message, NotifyError> {
        let parse = |addr: &str| {
            addr.parse::<Mailbox>()
                .map_err(|e| NotifyError::Config(format!("{addr}: {e}")))
        };
        Message::builder()
            .from(parse(&self.sender)?)
            .to(parse(&self.receiver)?)
            .subject(alert.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(alert.html_body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Email
    }

    async fn send(&self, alert: &JobAlert) -> Result<String, NotifyError> {
        let message = self.compose(alert)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        info!(channel = "email", job_id = alert.job_id, subject = %alert.subject, "Alert delivered");
        Ok(alert.subject.clone())
    }
}
