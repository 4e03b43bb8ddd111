//! Shared constants for the search target and browser identity
//!
//! Selectors describe the public (logged-out) job search markup. They are the
//! first thing to check when extraction starts returning empty cards.

/// Public job search endpoint
pub const SEARCH_ENDPOINT: &str = "https://www.linkedin.com/jobs/search/";

/// Offset step the search endpoint uses for its `start` parameter
pub const RESULTS_PER_PAGE: u32 = 25;

/// Result card container
pub const CARD_SELECTOR: &str = "div.base-card";

/// Card title
pub const TITLE_SELECTOR: &str = "h3.base-search-card__title";

/// Card company name
pub const COMPANY_SELECTOR: &str = "h4.base-search-card__subtitle";

/// Card location
pub const LOCATION_SELECTOR: &str = "span.job-search-card__location";

/// Card posting time; the date lives in its `datetime` attribute
pub const POSTED_SELECTOR: &str = "time";

/// Card link to the posting detail page
pub const LINK_SELECTOR: &str = "a.base-card__full-link";

/// "Next page" control used by the click-through pagination mode
pub const NEXT_PAGE_SELECTOR: &str = "button[aria-label='Next'], button[aria-label='Next page']";

/// Detail page description, primary then fallback
pub const DESCRIPTION_SELECTORS: &[&str] =
    &["div.description__text", "div.show-more-less-html__markup"];

/// Detail page criteria list items
pub const CRITERIA_SELECTOR: &str = "li.description__job-criteria-item";

/// Bounded wait for result cards to appear (seconds)
pub const CARD_WAIT_TIMEOUT_SECS: u64 = 15;

/// Upper bound for a configured pacing delay (seconds)
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Scroll steps used when settling a results page
pub const RESULTS_SCROLL_STEPS: u32 = 8;

/// Scroll steps used when settling a detail page
pub const DETAIL_SCROLL_STEPS: u32 = 4;

/// Employment types recognised in description text, checked in order
pub const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Contract", "Internship", "Temporary"];

/// Fallback desktop user agents; one is picked per session unless configured
///
/// Chrome releases roughly every four weeks; refresh quarterly.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_3) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.6778.204 Safari/537.36",
];

/// Chat alert text is truncated to this many characters in the audit log
pub const CHAT_AUDIT_MESSAGE_CHARS: usize = 180;

/// Upper bound for list page sizes
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Default list page size
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
