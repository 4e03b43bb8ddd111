use tokio_util::sync::CancellationToken;

use super::Pacer;
use crate::browser::{DriverResult, PageDriver};

/// Fallback scroll distance when the page reports no height yet
const MIN_SCROLL_PX: i64 = 600;

/// Scroll down in `steps` increments to trigger lazy loading, stopping
/// early once the document height stops growing.
pub(crate) async fn settle_scroll<D: PageDriver + ?Sized>(
    driver: &mut D,
    steps: u32,
    pacer: &Pacer,
    cancel: &CancellationToken,
) -> DriverResult<()> {
    let mut last_height = 0;
    for _ in 0..steps {
        let current = driver.scroll_height().await?;
        driver.scroll_by((current / 6).max(MIN_SCROLL_PX)).await?;
        if !pacer.pause_scroll(cancel).await {
            break;
        }
        let height = driver.scroll_height().await?;
        if height == last_height {
            break;
        }
        last_height = height;
    }
    Ok(())
}
