use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::element::Element;
use tracing::{debug, trace};

use super::{BrowserSession, DriverError, DriverFactory, DriverResult, ElementHandle, PageDriver};
use crate::config::ScrapeSessionConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// [`PageDriver`] over one Chromium tab.
///
/// Elements found since the last navigation live in an arena indexed by
/// [`ElementHandle`], since `chromiumoxide::Element` is not `Clone`.
pub struct ChromiumDriver {
    session: Option<BrowserSession>,
    page: Page,
    elements: Vec<Element>,
}

impl ChromiumDriver {
    pub async fn launch(config: &ScrapeSessionConfig) -> anyhow::Result<Self> {
        let session = BrowserSession::launch(config).await?;
        let page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                session.shutdown().await;
                return Err(e);
            }
        };
        Ok(Self {
            session: Some(session),
            page,
            elements: Vec::new(),
        })
    }

    fn element(&self, handle: ElementHandle) -> DriverResult<&Element> {
        self.elements
            .get(handle.0)
            .ok_or(DriverError::StaleElement(handle))
    }

    fn track(&mut self, element: Element) -> ElementHandle {
        self.elements.push(element);
        ElementHandle(self.elements.len() - 1)
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(DriverError::Closed)
        }
    }
}

fn query_error(selector: &str, e: impl std::fmt::Display) -> DriverError {
    DriverError::Query {
        selector: selector.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.elements.clear();
        let nav_error = |e: chromiumoxide::error::CdpError| DriverError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.page.goto(url).await.map_err(nav_error)?;
        self.page.wait_for_navigation().await.map_err(nav_error)?;
        debug!("Navigated to {url}");
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> DriverResult<bool> {
        self.ensure_open()?;
        let start = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                trace!("{selector} present after {:?}", start.elapsed());
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| query_error(selector, e))?;
        Ok(found.into_iter().map(|el| self.track(el)).collect())
    }

    async fn find_within(
        &mut self,
        parent: ElementHandle,
        selector: &str,
    ) -> DriverResult<Option<ElementHandle>> {
        let first = self
            .element(parent)?
            .find_elements(selector)
            .await
            .map_err(|e| query_error(selector, e))?
            .into_iter()
            .next();
        Ok(first.map(|el| self.track(el)))
    }

    async fn read_text(&mut self, element: ElementHandle) -> DriverResult<Option<String>> {
        self.element(element)?
            .inner_text()
            .await
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn read_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> DriverResult<Option<String>> {
        self.element(element)?
            .attribute(name)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn click(&mut self, element: ElementHandle) -> DriverResult<()> {
        self.element(element)?
            .click()
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        // Old handles point into the previous result list
        self.elements.clear();
        Ok(())
    }

    async fn scroll_by(&mut self, pixels: i64) -> DriverResult<()> {
        self.ensure_open()?;
        self.page
            .evaluate(format!("window.scrollBy(0, {pixels})"))
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(())
    }

    async fn scroll_height(&mut self) -> DriverResult<i64> {
        self.ensure_open()?;
        self.page
            .evaluate("document.body ? document.body.scrollHeight : 0")
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?
            .into_value::<i64>()
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn content(&mut self) -> DriverResult<String> {
        self.ensure_open()?;
        self.page
            .content()
            .await
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.elements.clear();
        if let Some(session) = self.session.take() {
            session.shutdown().await;
        }
        Ok(())
    }
}

/// Launches a fresh Chromium per run
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

#[async_trait]
impl DriverFactory for ChromiumLauncher {
    type Driver = ChromiumDriver;

    async fn open(&self, config: &ScrapeSessionConfig) -> DriverResult<ChromiumDriver> {
        ChromiumDriver::launch(config)
            .await
            .map_err(|e| DriverError::Launch(format!("{e:#}")))
    }
}
