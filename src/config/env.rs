//! Environment-sourced `AppConfig`
//!
//! Reading goes through a lookup closure so tests can feed a map instead of
//! mutating the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::types::{
    AppConfig, ChatConfig, ConfigError, EmailConfig, PaginationMode, ScheduleConfig,
    ScrapeSessionConfig,
};

impl AppConfig {
    /// Load from the process environment, reading `.env` first when present.
    ///
    /// # Errors
    ///
    /// Fails on unparsable numbers, addresses or an invalid scrape session.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!("Ignoring unreadable .env file: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite://jobs.db".to_string());
        let bind_addr: SocketAddr =
            parse_or(&get, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8000)))?;
        let cors_allow_origins = get("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000, http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let mut scrape = ScrapeSessionConfig::builder()
            .headless(flag(&get, "SCRAPER_HEADLESS", true))
            .pacing(
                parse_or(&get, "SCRAPER_DELAY_MIN", 2.0)?,
                parse_or(&get, "SCRAPER_DELAY_MAX", 5.0)?,
            )
            .max_pages(parse_or(&get, "SCRAPER_MAX_PAGES", 3)?)
            .enrich_details(flag(&get, "SCRAPER_ENRICH", false))
            .pagination(parse_or(&get, "SCRAPER_PAGINATION", PaginationMode::Offset)?);
        if let Some(path) = get("CHROMIUM_PATH") {
            scrape = scrape.chrome_executable(path);
        }
        if let Some(proxy) = get("SCRAPER_PROXY") {
            scrape = scrape.proxy(proxy);
        }
        if let Some(ua) = get("SCRAPER_USER_AGENT") {
            scrape = scrape.user_agent(ua);
        }
        let scrape = scrape.build()?;

        let email_defaults = EmailConfig::default();
        let email = EmailConfig {
            enabled: flag(&get, "EMAIL_ENABLED", false),
            smtp_server: get("SMTP_SERVER").unwrap_or(email_defaults.smtp_server),
            smtp_port: parse_or(&get, "SMTP_PORT", email_defaults.smtp_port)?,
            smtp_use_tls: flag(&get, "SMTP_USE_TLS", true),
            sender_email: get("SENDER_EMAIL"),
            sender_password: get("SENDER_PASSWORD"),
            receiver_email: get("RECEIVER_EMAIL"),
        };

        let chat_defaults = ChatConfig::default();
        let chat = ChatConfig {
            enabled: flag(&get, "TELEGRAM_ENABLED", false),
            bot_token: get("TELEGRAM_BOT_TOKEN"),
            chat_id: get("TELEGRAM_CHAT_ID"),
            api_base: get("TELEGRAM_API_BASE").unwrap_or(chat_defaults.api_base),
            timeout: chat_defaults.timeout,
        };

        let schedule_defaults = ScheduleConfig::default();
        let schedule = ScheduleConfig {
            cron: get("SCHEDULE_CRON").unwrap_or(schedule_defaults.cron),
            keywords: get("SCHEDULE_KEYWORDS").unwrap_or(schedule_defaults.keywords),
            location: get("SCHEDULE_LOCATION").unwrap_or(schedule_defaults.location),
            max_pages: scrape.max_pages(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            cors_allow_origins,
            scrape,
            email,
            chat,
            schedule,
            export_dir: get("EXPORT_DIR").map(PathBuf::from),
            run_deadline: match get("SCRAPE_DEADLINE_SECS") {
                Some(_) => Some(Duration::from_secs(parse_or(&get, "SCRAPE_DEADLINE_SECS", 0)?)),
                None => None,
            },
        })
    }
}

fn flag<G>(get: &G, key: &str, default: bool) -> bool
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite://jobs.db");
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.cors_allow_origins.len(), 2);
        assert!(config.scrape.headless());
        assert_eq!(config.scrape.delay_bounds(), (2.0, 5.0));
        assert_eq!(config.scrape.max_pages(), 3);
        assert!(!config.email.enabled);
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.schedule.cron, "0 8 * * *");
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn channels_are_gated_on_enabled_flag_and_fields() {
        let config = AppConfig::from_lookup(lookup(&[
            ("EMAIL_ENABLED", "true"),
            ("SENDER_EMAIL", "bot@example.com"),
            ("RECEIVER_EMAIL", "me@example.com"),
            ("TELEGRAM_ENABLED", "TRUE"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .unwrap();

        // password missing
        assert!(config.email.credentials().is_none());
        assert_eq!(config.chat.destination(), Some(("123:abc", "42")));
    }

    #[test]
    fn rejects_bad_numbers_and_inverted_pacing() {
        assert!(AppConfig::from_lookup(lookup(&[("SMTP_PORT", "abc")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup(&[
                ("SCRAPER_DELAY_MIN", "6"),
                ("SCRAPER_DELAY_MAX", "1"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn pagination_mode_parses() {
        let config =
            AppConfig::from_lookup(lookup(&[("SCRAPER_PAGINATION", "next")])).unwrap();
        assert_eq!(config.scrape.pagination(), PaginationMode::NextControl);
    }
}
