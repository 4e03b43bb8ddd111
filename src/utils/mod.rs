pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{clean_text, safe_truncate_chars};
pub use url_utils::{build_search_url, build_search_url_with_base, is_valid_source_link};
