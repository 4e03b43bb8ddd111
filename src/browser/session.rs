use std::path::PathBuf;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ScrapeSessionConfig;

/// A launched Chromium process, its CDP handler task and its profile dir.
///
/// Call [`BrowserSession::shutdown`] when done. Dropping without it still
/// aborts the handler and removes the profile dir, but cannot wait for the
/// process to exit.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    user_agent: String,
}

impl BrowserSession {
    pub async fn launch(config: &ScrapeSessionConfig) -> Result<Self> {
        let user_agent = config
            .user_agent()
            .map_or_else(crate::browser_setup::random_user_agent, str::to_string);

        let (browser, handler, user_data_dir) =
            crate::browser_setup::launch_browser(config, &user_agent).await?;

        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Blank page with stealth scripts registered, ready for the first
    /// navigation.
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open blank page")?;

        crate::kromekover::inject(&page, &self.user_agent)
            .await
            .context("Failed to apply stealth scripts")?;

        Ok(page)
    }

    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {e}");
        }
        self.handler.abort();
        self.cleanup_profile_dir();
        info!("Browser session shut down");
    }

    /// Blocking; runs from `Drop` too, after the process has released its
    /// files.
    fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Removing browser profile dir {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove browser profile dir {}: {e}",
                    path.display()
                );
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.user_data_dir.is_some() {
            warn!("BrowserSession dropped without shutdown, cleaning up in Drop");
            self.cleanup_profile_dir();
        }
    }
}
