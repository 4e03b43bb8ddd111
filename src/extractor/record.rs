use serde::Serialize;

use crate::browser::DriverResult;
use crate::models::{NewJobPosting, ValidationError};

/// Result of reading one optional field from the page.
///
/// Distinguishes a field the page never had from one we failed to read, so
/// both can be logged and tested separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldRead<T> {
    Found(T),
    Absent,
    Faulted(String),
}

impl<T> FieldRead<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent | Self::Faulted(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent | Self::Faulted(_) => None,
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldRead<U> {
        match self {
            Self::Found(v) => FieldRead::Found(f(v)),
            Self::Absent => FieldRead::Absent,
            Self::Faulted(e) => FieldRead::Faulted(e),
        }
    }
}

impl<T> From<DriverResult<Option<T>>> for FieldRead<T> {
    fn from(result: DriverResult<Option<T>>) -> Self {
        match result {
            Ok(Some(v)) => Self::Found(v),
            Ok(None) => Self::Absent,
            Err(e) => Self::Faulted(e.to_string()),
        }
    }
}

impl FieldRead<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.value().map(String::as_str)
    }
}

/// Long-form fields read from a posting's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobDetails {
    pub description_text: Option<String>,
    pub description_html: Option<String>,
    pub criteria: Vec<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "details", rename_all = "snake_case")]
pub enum Enrichment {
    NotAttempted,
    Enriched(JobDetails),
    Failed(String),
}

impl Enrichment {
    pub fn details(&self) -> Option<&JobDetails> {
        match self {
            Self::Enriched(d) => Some(d),
            Self::NotAttempted | Self::Failed(_) => None,
        }
    }
}

/// One result card as read from the page, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawListingRecord {
    pub title: FieldRead<String>,
    pub company: FieldRead<String>,
    pub location: FieldRead<String>,
    /// `datetime` attribute, date part only
    pub posted_date: FieldRead<String>,
    pub source_link: String,
    pub keyword_tag: Option<String>,
    pub enrichment: Enrichment,
}

impl RawListingRecord {
    /// Record with only a link, everything else absent
    pub fn with_link(source_link: impl Into<String>) -> Self {
        Self {
            title: FieldRead::Absent,
            company: FieldRead::Absent,
            location: FieldRead::Absent,
            posted_date: FieldRead::Absent,
            source_link: source_link.into(),
            keyword_tag: None,
            enrichment: Enrichment::NotAttempted,
        }
    }

    /// Validate into the ingestion input
    pub fn to_new_posting(&self) -> Result<NewJobPosting, ValidationError> {
        let details = self.enrichment.details();
        NewJobPosting::new(self.title.as_deref().unwrap_or_default(), &self.source_link)?
            .company(self.company.as_deref())
            .location(self.location.as_deref())
            .keyword_tag(self.keyword_tag.as_deref())
            .employment_type(details.and_then(|d| d.employment_type.as_deref()))
            .experience_level(details.and_then(|d| d.experience_level.as_deref()))
            .posted_on(self.posted_date.as_deref())
    }
}
