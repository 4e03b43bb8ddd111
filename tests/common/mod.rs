//! Shared fixtures: a scripted in-memory browser and recording notifiers

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use jobwatch::alerts::{JobAlert, Notifier, NotifyError};
use jobwatch::browser::{DriverError, DriverFactory, DriverResult, ElementHandle, PageDriver};
use jobwatch::config::{PaginationMode, ScrapeSessionConfig};
use jobwatch::models::AlertChannel;
use jobwatch::utils::{
    CARD_SELECTOR, COMPANY_SELECTOR, LINK_SELECTOR, LOCATION_SELECTOR, NEXT_PAGE_SELECTOR,
    POSTED_SELECTOR, RESULTS_PER_PAGE, TITLE_SELECTOR,
};

/// Session config with pacing disabled
#[allow(dead_code)]
pub fn fast_config(max_pages: u32, pagination: PaginationMode) -> ScrapeSessionConfig {
    ScrapeSessionConfig::builder()
        .pacing(0.0, 0.0)
        .max_pages(max_pages)
        .pagination(pagination)
        .card_wait_timeout(Duration::from_millis(50))
        .build()
        .unwrap()
}

/// One scripted result card. `None` fields are absent from the markup.
#[derive(Debug, Clone, Default)]
pub struct FakeCard {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub datetime: Option<String>,
    pub link: Option<String>,
    /// Selectors whose lookup errors on this card
    pub faulty: Vec<&'static str>,
}

#[allow(dead_code)]
impl FakeCard {
    pub fn new(title: &str, company: &str, link: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            location: Some("Berlin, Germany".to_string()),
            datetime: Some("2024-03-01".to_string()),
            link: Some(link.to_string()),
            faulty: Vec::new(),
        }
    }

    pub fn without_company(mut self) -> Self {
        self.company = None;
        self
    }

    pub fn without_link(mut self) -> Self {
        self.link = None;
        self
    }

    pub fn with_datetime(mut self, raw: &str) -> Self {
        self.datetime = Some(raw.to_string());
        self
    }

    pub fn faulting(mut self, selector: &'static str) -> Self {
        self.faulty.push(selector);
        self
    }
}

/// What the fake browser serves
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    /// Result pages in order; a missing index renders an empty page
    pub pages: Vec<Vec<FakeCard>>,
    /// Detail page HTML by link
    pub details: HashMap<String, String>,
    /// URLs (exact) whose navigation fails
    pub broken_urls: Vec<String>,
    /// Cancel this token when the given results page index is loaded
    pub cancel_on_page: Option<(usize, CancellationToken)>,
    /// Document height after the n-th scroll since the last navigation; the
    /// last entry repeats. Empty means a fixed 1200px page.
    pub scroll_heights: Vec<i64>,
}

/// Observations shared between a factory and the drivers it opened
#[derive(Debug, Default)]
pub struct FakeLog {
    pub navigations: Vec<String>,
    pub opened: usize,
    pub closed: usize,
    pub clicks: usize,
    /// Distance of every scroll, in order
    pub scrolls: Vec<i64>,
}

#[allow(dead_code)]
impl FakeLog {
    pub fn results_loads(&self) -> usize {
        self.navigations.iter().filter(|u| u.contains("keywords=")).count()
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Card(usize),
    Field(usize, &'static str),
    NextButton { enabled: bool },
}

#[derive(Debug, Clone)]
enum Location {
    Blank,
    Results(usize),
    Detail(String),
}

pub struct FakeDriver {
    site: Arc<FakeSite>,
    log: Arc<Mutex<FakeLog>>,
    at: Location,
    nodes: Vec<Node>,
    scrolled: usize,
    closed: bool,
}

#[allow(dead_code)]
impl FakeDriver {
    pub fn new(site: Arc<FakeSite>, log: Arc<Mutex<FakeLog>>) -> Self {
        Self {
            site,
            log,
            at: Location::Blank,
            nodes: Vec::new(),
            scrolled: 0,
            closed: false,
        }
    }

    fn cards(&self) -> &[FakeCard] {
        match self.at {
            Location::Results(page) => self.site.pages.get(page).map_or(&[], Vec::as_slice),
            _ => &[],
        }
    }

    fn node(&self, handle: ElementHandle) -> DriverResult<Node> {
        self.nodes
            .get(handle.0)
            .copied()
            .ok_or(DriverError::StaleElement(handle))
    }

    fn push(&mut self, node: Node) -> ElementHandle {
        self.nodes.push(node);
        ElementHandle(self.nodes.len() - 1)
    }

    fn card(&self, index: usize) -> DriverResult<&FakeCard> {
        self.cards().get(index).ok_or(DriverError::Closed)
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.closed {
            Err(DriverError::Closed)
        } else {
            Ok(())
        }
    }
}

fn field_value<'c>(card: &'c FakeCard, selector: &str) -> Option<&'c String> {
    match selector {
        s if s == TITLE_SELECTOR => card.title.as_ref(),
        s if s == COMPANY_SELECTOR => card.company.as_ref(),
        s if s == LOCATION_SELECTOR => card.location.as_ref(),
        s if s == POSTED_SELECTOR => card.datetime.as_ref(),
        s if s == LINK_SELECTOR => card.link.as_ref(),
        _ => None,
    }
}

fn field_selector(selector: &str) -> Option<&'static str> {
    [TITLE_SELECTOR, COMPANY_SELECTOR, LOCATION_SELECTOR, POSTED_SELECTOR, LINK_SELECTOR]
        .into_iter()
        .find(|s| *s == selector)
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.log.lock().unwrap().navigations.push(url.to_string());
        self.nodes.clear();
        self.scrolled = 0;
        if self.site.broken_urls.iter().any(|u| u == url) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }

        let parsed = url::Url::parse(url).map_err(|e| DriverError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.query_pairs().any(|(k, _)| k == "keywords") {
            let start: usize = parsed
                .query_pairs()
                .find(|(k, _)| k == "start")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            let page = start / RESULTS_PER_PAGE as usize;
            self.at = Location::Results(page);
            if let Some((cancel_page, token)) = &self.site.cancel_on_page
                && *cancel_page == page
            {
                token.cancel();
            }
        } else {
            self.at = Location::Detail(url.to_string());
        }
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> DriverResult<bool> {
        self.ensure_open()?;
        Ok(match selector {
            "body" => true,
            s if s == CARD_SELECTOR => !self.cards().is_empty(),
            _ => false,
        })
    }

    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        if selector == CARD_SELECTOR {
            let count = self.cards().len();
            return Ok((0..count).map(|i| self.push(Node::Card(i))).collect());
        }
        if selector == NEXT_PAGE_SELECTOR
            && let Location::Results(page) = self.at
        {
            let enabled = self.site.pages.get(page + 1).is_some_and(|p| !p.is_empty());
            return Ok(vec![self.push(Node::NextButton { enabled })]);
        }
        Ok(Vec::new())
    }

    async fn find_within(
        &mut self,
        parent: ElementHandle,
        selector: &str,
    ) -> DriverResult<Option<ElementHandle>> {
        let Node::Card(index) = self.node(parent)? else {
            return Ok(None);
        };
        let card = self.card(index)?;
        if card.faulty.iter().any(|s| *s == selector) {
            return Err(DriverError::Query {
                selector: selector.to_string(),
                reason: "detached node".to_string(),
            });
        }
        let Some(field) = field_selector(selector) else {
            return Ok(None);
        };
        if field_value(card, field).is_none() {
            return Ok(None);
        }
        Ok(Some(self.push(Node::Field(index, field))))
    }

    async fn read_text(&mut self, element: ElementHandle) -> DriverResult<Option<String>> {
        match self.node(element)? {
            Node::Field(index, field) => Ok(field_value(self.card(index)?, field).cloned()),
            _ => Ok(None),
        }
    }

    async fn read_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> DriverResult<Option<String>> {
        match (self.node(element)?, name) {
            (Node::Field(index, field), "href") if field == LINK_SELECTOR => {
                Ok(field_value(self.card(index)?, field).cloned())
            }
            (Node::Field(index, field), "datetime") if field == POSTED_SELECTOR => {
                Ok(field_value(self.card(index)?, field).cloned())
            }
            (Node::NextButton { enabled: false }, "aria-disabled") => Ok(Some("true".to_string())),
            _ => Ok(None),
        }
    }

    async fn click(&mut self, element: ElementHandle) -> DriverResult<()> {
        if let Node::NextButton { enabled: true } = self.node(element)?
            && let Location::Results(page) = self.at
        {
            self.at = Location::Results(page + 1);
            self.scrolled = 0;
            self.log.lock().unwrap().clicks += 1;
        }
        self.nodes.clear();
        Ok(())
    }

    async fn scroll_by(&mut self, pixels: i64) -> DriverResult<()> {
        self.ensure_open()?;
        self.scrolled += 1;
        self.log.lock().unwrap().scrolls.push(pixels);
        Ok(())
    }

    async fn scroll_height(&mut self) -> DriverResult<i64> {
        self.ensure_open()?;
        let heights = &self.site.scroll_heights;
        Ok(heights
            .get(self.scrolled)
            .or(heights.last())
            .copied()
            .unwrap_or(1200))
    }

    async fn content(&mut self) -> DriverResult<String> {
        self.ensure_open()?;
        Ok(match &self.at {
            Location::Detail(link) => self
                .site
                .details
                .get(link)
                .cloned()
                .unwrap_or_else(|| "<html><body></body></html>".to_string()),
            _ => "<html><body></body></html>".to_string(),
        })
    }

    async fn close(&mut self) -> DriverResult<()> {
        if !self.closed {
            self.closed = true;
            self.log.lock().unwrap().closed += 1;
        }
        Ok(())
    }
}

/// Opens [`FakeDriver`]s over one shared site
#[derive(Clone)]
pub struct FakeFactory {
    pub site: Arc<FakeSite>,
    pub log: Arc<Mutex<FakeLog>>,
    pub fail_launch: bool,
}

#[allow(dead_code)]
impl FakeFactory {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            log: Arc::new(Mutex::new(FakeLog::default())),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(FakeSite::default())
        }
    }

    pub fn driver(&self) -> FakeDriver {
        FakeDriver::new(self.site.clone(), self.log.clone())
    }
}

#[async_trait]
impl DriverFactory for FakeFactory {
    type Driver = FakeDriver;

    async fn open(&self, _config: &ScrapeSessionConfig) -> DriverResult<FakeDriver> {
        if self.fail_launch {
            return Err(DriverError::Launch("no chromium executable found".to_string()));
        }
        self.log.lock().unwrap().opened += 1;
        Ok(self.driver())
    }
}

/// Notifier that records what it was asked to send
pub struct RecordingNotifier {
    channel: AlertChannel,
    fail: bool,
    pub sent: Mutex<Vec<JobAlert>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn ok(channel: AlertChannel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            fail: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(channel: AlertChannel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn channel(&self) -> AlertChannel {
        self.channel
    }

    async fn send(&self, alert: &JobAlert) -> Result<String, NotifyError> {
        self.sent.lock().unwrap().push(alert.clone());
        if self.fail {
            return Err(NotifyError::Smtp("connection refused".to_string()));
        }
        Ok(alert.subject.clone())
    }
}
