//! Core configuration types

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration errors raised while building or loading settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid pacing bounds: need 0 <= min ({min}s) <= max ({max}s) <= 3600s")]
    PacingBounds { min: f64, max: f64 },

    #[error("max_pages must be at least 1")]
    ZeroPages,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// How the extractor advances from one result page to the next.
///
/// Chosen once per session; the extractor never falls back from one mode to
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Re-navigate with `start` advanced by 25 per page
    #[default]
    Offset,
    /// Activate the on-page "next" control; stop when it is missing or disabled
    NextControl,
}

impl std::str::FromStr for PaginationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" | "start" => Ok(Self::Offset),
            "next" | "next_control" | "click" => Ok(Self::NextControl),
            other => Err(ConfigError::InvalidValue {
                key: "pagination".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Settings owned by a single scrape session. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSessionConfig {
    pub(crate) delay_min_secs: f64,
    pub(crate) delay_max_secs: f64,
    pub(crate) headless: bool,
    pub(crate) proxy: Option<String>,
    pub(crate) max_pages: u32,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) user_agent: Option<String>,
    pub(crate) pagination: PaginationMode,
    pub(crate) enrich_details: bool,
    pub(crate) card_wait_timeout: Duration,
    pub(crate) search_endpoint: String,
}

/// SMTP settings for the email channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_use_tls: bool,
    pub sender_email: Option<String>,
    #[serde(skip_serializing)]
    pub sender_password: Option<String>,
    pub receiver_email: Option<String>,
}

/// Borrowed view of a fully configured email channel
#[derive(Debug, Clone, Copy)]
pub struct EmailCredentials<'a> {
    pub sender: &'a str,
    pub password: &'a str,
    pub receiver: &'a str,
}

impl EmailConfig {
    /// Returns the credentials only when the channel is enabled and every
    /// required field is present and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<EmailCredentials<'_>> {
        if !self.enabled {
            return None;
        }
        let sender = non_empty(self.sender_email.as_deref())?;
        let password = non_empty(self.sender_password.as_deref())?;
        let receiver = non_empty(self.receiver_email.as_deref())?;
        Some(EmailCredentials {
            sender,
            password,
            receiver,
        })
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_use_tls: true,
            sender_email: None,
            sender_password: None,
            receiver_email: None,
        }
    }
}

/// Telegram bot settings for the chat channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl ChatConfig {
    /// `(bot_token, chat_id)` when the channel is enabled and configured.
    #[must_use]
    pub fn destination(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        Some((
            non_empty(self.bot_token.as_deref())?,
            non_empty(self.chat_id.as_deref())?,
        ))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// The fixed query the cron trigger runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub cron: String,
    pub keywords: String,
    pub location: String,
    pub max_pages: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: "0 8 * * *".to_string(),
            keywords: "Software Engineer".to_string(),
            location: "Remote".to_string(),
            max_pages: 3,
        }
    }
}

/// Process-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_allow_origins: Vec<String>,
    pub scrape: ScrapeSessionConfig,
    pub email: EmailConfig,
    pub chat: ChatConfig,
    pub schedule: ScheduleConfig,
    pub export_dir: Option<PathBuf>,
    /// Wall-clock cap on a single run; the run is cancelled when it elapses
    pub run_deadline: Option<Duration>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
