//! Locating, downloading and launching Chromium

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::config::ScrapeSessionConfig;
use crate::utils::USER_AGENT_POOL;

/// Pick a user agent from the built-in pool
#[must_use]
pub fn random_user_agent() -> String {
    USER_AGENT_POOL
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Find a Chrome/Chromium executable.
///
/// Order: explicit override, `CHROMIUM_PATH`, well-known install paths,
/// then `which`.
pub async fn find_browser_executable(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            info!("Using configured browser executable: {}", path.display());
            return Ok(path.to_path_buf());
        }
        warn!(
            "Configured browser executable does not exist: {}",
            path.display()
        );
    }

    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH points to non-existent file: {}", path.display());
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    };

    for candidate in candidates {
        let path = match candidate.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(candidate),
        };
        if path.exists() {
            info!(path = %path.display(), "Using Chromium executable");
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which': {found}");
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    warn!("No Chrome/Chromium executable found, falling back to managed download");
    Err(anyhow::anyhow!("no Chromium executable found; set CHROMIUM_PATH"))
}

/// Download Chromium into the user cache dir and return its executable path
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "Could not determine cache directory, using {}",
                fallback.display()
            );
            fallback
        })
        .join("jobwatch")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("creating browser cache dir")?;
    info!(dir = %cache_dir.display(), "No local Chromium, fetching one");

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("invalid browser fetcher options")?,
    );

    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;
    info!("Downloaded Chromium to: {}", revision.folder_path.display());

    Ok(revision.executable_path)
}

/// Launch Chromium for one scrape session.
///
/// Returns the browser, its tracked CDP handler task and the throwaway
/// profile directory, which the caller removes after the process exits.
pub async fn launch_browser(
    config: &ScrapeSessionConfig,
    user_agent: &str,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = match find_browser_executable(config.chrome_executable()).await {
        Ok(path) => path,
        Err(_) => download_managed_browser().await?,
    };

    let user_data_dir = std::env::temp_dir().join(format!(
        "jobwatch_chrome_{}_{}",
        std::process::id(),
        hex::encode(rand::random::<[u8; 4]>())
    ));
    std::fs::create_dir_all(&user_data_dir).context("creating browser profile dir")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    builder = if config.headless() {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    if let Some(proxy) = config.proxy() {
        builder = builder.arg(format!("--proxy-server={proxy}"));
    }

    builder = builder
        .arg(format!("--user-agent={user_agent}"))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .arg("--disable-breakpad")
        .arg("--disable-features=TranslateUI")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--mute-audio");

    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("invalid browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Chromium failed to start")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let msg = e.to_string();
                // chromiumoxide does not model every CDP event Chrome emits
                if msg.contains("data did not match any variant of untagged enum Message")
                    || msg.contains("Failed to deserialize WS response")
                {
                    trace!("Ignoring unknown CDP message: {msg}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        debug!("CDP handler loop ended");
    });

    info!(
        headless = config.headless(),
        proxy = config.proxy().is_some(),
        "Browser launched"
    );

    Ok((browser, handler_task, user_data_dir))
}
