//! Search URL construction and link validation

use url::Url;

use super::constants::SEARCH_ENDPOINT;

/// Build the search URL for a query, with an optional `start` offset.
///
/// The offset is omitted for the first page so the URL matches what a browser
/// user would land on.
pub fn build_search_url(keywords: &str, location: &str, start: u32) -> Result<Url, url::ParseError> {
    build_search_url_with_base(SEARCH_ENDPOINT, keywords, location, start)
}

/// Same as [`build_search_url`] against an arbitrary endpoint.
pub fn build_search_url_with_base(
    base: &str,
    keywords: &str,
    location: &str,
    start: u32,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("keywords", keywords).append_pair("location", location);
        if start > 0 {
            pairs.append_pair("start", &start.to_string());
        }
    }
    Ok(url)
}

/// A stored posting link must be non-empty and start with an `http` scheme marker.
#[must_use]
pub fn is_valid_source_link(link: &str) -> bool {
    !link.trim().is_empty() && link.starts_with("http")
}
