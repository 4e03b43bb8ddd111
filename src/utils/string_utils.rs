//! UTF-8-safe string helpers

/// Truncate to at most `max_chars` characters without splitting a code point.
///
/// # Examples
/// ```
/// # use jobwatch::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("Grüße", 3), "Grü");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Trim and collapse a scraped text node; empty results become `None`.
pub fn clean_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "🎉🎊🎈";
        assert_eq!(safe_truncate_chars(text, 2), "🎉🎊");
        assert_eq!(safe_truncate_chars(text, 0), "");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  Senior\n   Backend  Engineer "),
            Some("Senior Backend Engineer".to_string())
        );
        assert_eq!(clean_text(" \n\t "), None);
    }
}
