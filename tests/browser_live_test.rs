//! Runs against a real Chromium. Needs a browser on the machine and network
//! access, so every test here is ignored by default:
//!
//! `cargo test --test browser_live_test -- --ignored`

use jobwatch::browser::{ChromiumLauncher, DriverFactory, PageDriver};
use jobwatch::config::{PaginationMode, ScrapeSessionConfig};
use jobwatch::extractor::Extractor;

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn chromium_loads_a_page() {
    let config = ScrapeSessionConfig::builder().pacing(0.0, 0.0).build().unwrap();
    let mut driver = ChromiumLauncher.open(&config).await.unwrap();

    driver.navigate("https://example.com/").await.unwrap();
    let html = driver.content().await.unwrap();
    assert!(html.contains("Example Domain"));

    let heading = driver.find_all("h1").await.unwrap();
    assert_eq!(heading.len(), 1);
    let text = driver.read_text(heading[0]).await.unwrap();
    assert_eq!(text.as_deref(), Some("Example Domain"));

    driver.close().await.unwrap();
    driver.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn live_search_first_page() {
    let config = ScrapeSessionConfig::builder()
        .pacing(1.0, 2.0)
        .max_pages(1)
        .pagination(PaginationMode::Offset)
        .build()
        .unwrap();
    let mut driver = ChromiumLauncher.open(&config).await.unwrap();

    let outcome = Extractor::new(&mut driver, &config)
        .collect("Software Engineer", "Remote")
        .await;
    driver.close().await.unwrap();

    for record in &outcome.records {
        assert!(record.source_link.starts_with("http"));
    }
}

#[tokio::test]
#[ignore = "requires Chromium"]
async fn evasions_apply_before_page_scripts() -> anyhow::Result<()> {
    use jobwatch::browser::BrowserSession;

    let config = ScrapeSessionConfig::builder().build()?;
    let session = BrowserSession::launch(&config).await?;
    let page = session.new_page().await?;

    page.goto("data:text/html,<html><body></body></html>").await?;

    let webdriver = page.evaluate("navigator.webdriver === undefined").await?;
    assert_eq!(webdriver.value().and_then(|v| v.as_bool()), Some(true));

    let ua = page.evaluate("navigator.userAgent").await?;
    assert_eq!(
        ua.value().and_then(|v| v.as_str()),
        Some(session.user_agent())
    );

    session.shutdown().await;
    Ok(())
}
