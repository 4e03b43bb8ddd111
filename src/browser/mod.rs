//! Browser capability used by the extractor and enricher.
//!
//! Scraping code only talks to [`PageDriver`]. [`ChromiumDriver`] backs it
//! with a real headless Chromium, tests back it with a scripted fake.

mod chromium;
mod driver;
mod session;

pub use chromium::{ChromiumDriver, ChromiumLauncher};
pub use driver::{DriverError, DriverFactory, DriverResult, ElementHandle, PageDriver};
pub use session::BrowserSession;
