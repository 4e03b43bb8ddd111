use tracing::{debug, trace};

use super::{FieldRead, RawListingRecord};
use crate::browser::{DriverResult, ElementHandle, PageDriver};
use crate::utils::{
    CARD_SELECTOR, COMPANY_SELECTOR, LINK_SELECTOR, LOCATION_SELECTOR, POSTED_SELECTOR,
    TITLE_SELECTOR, clean_text,
};

/// Parse every result card on the current page.
///
/// Only the card lookup itself can fail; per-card problems drop that card.
pub(super) async fn collect_cards<D: PageDriver + ?Sized>(
    driver: &mut D,
    keyword_tag: &str,
) -> DriverResult<Vec<RawListingRecord>> {
    let cards = driver.find_all(CARD_SELECTOR).await?;
    let mut records = Vec::with_capacity(cards.len());

    for (index, card) in cards.into_iter().enumerate() {
        match parse_card(driver, card).await {
            Some(mut record) => {
                record.keyword_tag = clean_text(keyword_tag);
                records.push(record);
            }
            None => trace!(index, "Dropped card without link"),
        }
    }
    Ok(records)
}

async fn parse_card<D: PageDriver + ?Sized>(
    driver: &mut D,
    card: ElementHandle,
) -> Option<RawListingRecord> {
    let link = match attribute_of(driver, card, LINK_SELECTOR, "href").await {
        FieldRead::Found(link) => link,
        FieldRead::Absent => return None,
        FieldRead::Faulted(e) => {
            debug!("Card link unreadable: {e}");
            return None;
        }
    };

    let posted_date = attribute_of(driver, card, POSTED_SELECTOR, "datetime")
        .await
        .map(|raw| raw.split('T').next().unwrap_or_default().to_string());

    let record = RawListingRecord {
        title: text_of(driver, card, TITLE_SELECTOR).await,
        company: text_of(driver, card, COMPANY_SELECTOR).await,
        location: text_of(driver, card, LOCATION_SELECTOR).await,
        posted_date,
        ..RawListingRecord::with_link(link)
    };

    for (name, field) in [
        ("title", &record.title),
        ("company", &record.company),
        ("location", &record.location),
        ("posted_date", &record.posted_date),
    ] {
        if let FieldRead::Faulted(e) = field {
            debug!(field = name, link = %record.source_link, "Card field unreadable: {e}");
        }
    }

    Some(record)
}

async fn text_of<D: PageDriver + ?Sized>(
    driver: &mut D,
    card: ElementHandle,
    selector: &str,
) -> FieldRead<String> {
    match driver.find_within(card, selector).await {
        Ok(Some(el)) => match FieldRead::from(driver.read_text(el).await) {
            FieldRead::Found(t) => clean_text(&t).map_or(FieldRead::Absent, FieldRead::Found),
            other => other,
        },
        Ok(None) => FieldRead::Absent,
        Err(e) => FieldRead::Faulted(e.to_string()),
    }
}

async fn attribute_of<D: PageDriver + ?Sized>(
    driver: &mut D,
    card: ElementHandle,
    selector: &str,
    attribute: &str,
) -> FieldRead<String> {
    match driver.find_within(card, selector).await {
        Ok(Some(el)) => match FieldRead::from(driver.read_attribute(el, attribute).await) {
            FieldRead::Found(v) if v.trim().is_empty() => FieldRead::Absent,
            FieldRead::Found(v) => FieldRead::Found(v.trim().to_string()),
            other => other,
        },
        Ok(None) => FieldRead::Absent,
        Err(e) => FieldRead::Faulted(e.to_string()),
    }
}
