use std::time::Duration;

use async_trait::async_trait;

use crate::config::ScrapeSessionConfig;

/// Opaque reference to an element found on the current page.
///
/// Handles are only meaningful to the driver that issued them and become
/// stale after the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("query {selector:?} failed: {reason}")]
    Query { selector: String, reason: String },

    #[error("element {0:?} is stale or unknown")]
    StaleElement(ElementHandle),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("browser session is closed")]
    Closed,
}

pub type DriverResult<T> = Result<T, DriverError>;

/// The operations scraping needs from a browser page.
///
/// Every call may fail independently; callers decide whether a failure is
/// fatal for the page, the card, or only the field being read.
#[async_trait]
pub trait PageDriver: Send {
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Wait until `selector` matches at least one element.
    ///
    /// Returns `Ok(false)` when `timeout` elapses first.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> DriverResult<bool>;

    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<ElementHandle>>;

    /// First descendant of `parent` matching `selector`
    async fn find_within(
        &mut self,
        parent: ElementHandle,
        selector: &str,
    ) -> DriverResult<Option<ElementHandle>>;

    async fn read_text(&mut self, element: ElementHandle) -> DriverResult<Option<String>>;

    async fn read_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> DriverResult<Option<String>>;

    async fn click(&mut self, element: ElementHandle) -> DriverResult<()>;

    async fn scroll_by(&mut self, pixels: i64) -> DriverResult<()>;

    async fn scroll_height(&mut self) -> DriverResult<i64>;

    /// Serialized HTML of the current document
    async fn content(&mut self) -> DriverResult<String>;

    /// Release the browser. Calling it twice is a no-op.
    async fn close(&mut self) -> DriverResult<()>;
}

/// Opens one driver per pipeline run
#[async_trait]
pub trait DriverFactory: Send + Sync {
    type Driver: PageDriver + 'static;

    async fn open(&self, config: &ScrapeSessionConfig) -> DriverResult<Self::Driver>;
}
