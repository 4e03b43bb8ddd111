//! Job posting entity and its validated insert form

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{clean_text, is_valid_source_link};

/// A stored posting. `source_link` is unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub source_link: String,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub keyword_tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reasons a scraped record is refused at the ingestion boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is missing or blank")]
    MissingTitle,

    #[error("source link {0:?} is not an http(s) URL")]
    InvalidLink(String),

    #[error("posted date {0:?} is not a YYYY-MM-DD date")]
    MalformedDate(String),
}

/// Insert form of [`JobPosting`]. Only constructible with a valid title and
/// link, so nothing downstream re-checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJobPosting {
    title: String,
    source_link: String,
    company: Option<String>,
    location: Option<String>,
    posted_date: Option<NaiveDate>,
    experience_level: Option<String>,
    employment_type: Option<String>,
    keyword_tag: Option<String>,
}

impl NewJobPosting {
    /// # Errors
    ///
    /// Rejects blank titles and links that do not start with `http`.
    pub fn new(title: &str, source_link: &str) -> Result<Self, ValidationError> {
        let title = clean_text(title).ok_or(ValidationError::MissingTitle)?;
        let source_link = source_link.trim();
        if !is_valid_source_link(source_link) {
            return Err(ValidationError::InvalidLink(source_link.to_string()));
        }
        Ok(Self {
            title,
            source_link: source_link.to_string(),
            company: None,
            location: None,
            posted_date: None,
            experience_level: None,
            employment_type: None,
            keyword_tag: None,
        })
    }

    #[must_use]
    pub fn company(mut self, company: Option<&str>) -> Self {
        self.company = company.and_then(clean_text);
        self
    }

    #[must_use]
    pub fn location(mut self, location: Option<&str>) -> Self {
        self.location = location.and_then(clean_text);
        self
    }

    #[must_use]
    pub fn posted_date(mut self, date: Option<NaiveDate>) -> Self {
        self.posted_date = date;
        self
    }

    /// Parse a `YYYY-MM-DD` date, or the date part of an ISO timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedDate`] when the text is not a date.
    pub fn posted_on(self, raw: Option<&str>) -> Result<Self, ValidationError> {
        let date = raw.map(parse_posted_date).transpose()?;
        Ok(self.posted_date(date))
    }

    #[must_use]
    pub fn experience_level(mut self, level: Option<&str>) -> Self {
        self.experience_level = level.and_then(clean_text);
        self
    }

    #[must_use]
    pub fn employment_type(mut self, kind: Option<&str>) -> Self {
        self.employment_type = kind.and_then(clean_text);
        self
    }

    #[must_use]
    pub fn keyword_tag(mut self, tag: Option<&str>) -> Self {
        self.keyword_tag = tag.and_then(clean_text);
        self
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn source_link(&self) -> &str {
        &self.source_link
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn posted(&self) -> Option<NaiveDate> {
        self.posted_date
    }

    pub fn experience(&self) -> Option<&str> {
        self.experience_level.as_deref()
    }

    pub fn employment(&self) -> Option<&str> {
        self.employment_type.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword_tag.as_deref()
    }
}

fn parse_posted_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| ValidationError::MalformedDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_link_and_relative_link() {
        assert_eq!(
            NewJobPosting::new("Engineer", ""),
            Err(ValidationError::InvalidLink(String::new()))
        );
        assert!(matches!(
            NewJobPosting::new("Engineer", "/jobs/view/1"),
            Err(ValidationError::InvalidLink(_))
        ));
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            NewJobPosting::new("   ", "https://example.com/1"),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn date_accepts_timestamp_prefix_and_rejects_garbage() {
        let base = NewJobPosting::new("Engineer", "https://example.com/1").unwrap();
        let dated = base.clone().posted_on(Some("2026-10-01T08:00:00Z")).unwrap();
        assert_eq!(dated.posted(), NaiveDate::from_ymd_opt(2026, 10, 1));

        assert!(matches!(
            base.posted_on(Some("3 days ago")),
            Err(ValidationError::MalformedDate(_))
        ));
    }

    #[test]
    fn optional_fields_are_cleaned() {
        let job = NewJobPosting::new(" Backend\nEngineer ", "https://example.com/1")
            .unwrap()
            .company(Some("  "))
            .location(Some(" Berlin "));
        assert_eq!(job.title_text(), "Backend Engineer");
        assert_eq!(job.company_name(), None);
        assert_eq!(job.location_name(), Some("Berlin"));
    }
}
