//! Listing filters and the sort whitelist

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use crate::utils::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Filters accepted by [`JobStore::list`](super::JobStore::list) and
/// [`JobStore::count`](super::JobStore::count).
///
/// Deserializes straight from API query strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive substring of title or keyword tag
    #[serde(alias = "keyword")]
    pub q: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
}

impl JobFilter {
    /// Limit clamped to `[1, 200]`, default 50
    #[must_use]
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    #[must_use]
    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.order_by
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or_default()
    }

    /// Append the `WHERE` clause. Empty strings count as "no filter".
    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut sep = " WHERE ";
        if let Some(q) = non_blank(self.q.as_deref()) {
            let like = format!("%{q}%");
            qb.push(sep)
                .push("(title LIKE ")
                .push_bind(like.clone())
                .push(" OR keyword_tag LIKE ")
                .push_bind(like)
                .push(")");
            sep = " AND ";
        }
        if let Some(company) = non_blank(self.company.as_deref()) {
            qb.push(sep).push("company = ").push_bind(company.to_string());
            sep = " AND ";
        }
        if let Some(location) = non_blank(self.location.as_deref()) {
            qb.push(sep).push("location = ").push_bind(location.to_string());
            sep = " AND ";
        }
        if let Some(from) = self.date_from {
            qb.push(sep).push("posted_date >= ").push_bind(from);
            sep = " AND ";
        }
        if let Some(to) = self.date_to {
            qb.push(sep).push("posted_date <= ").push_bind(to);
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Columns a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Title,
    Company,
    Location,
    PostedDate,
    ExperienceLevel,
    EmploymentType,
    KeywordTag,
    CreatedAt,
}

impl SortKey {
    fn from_column(name: &str) -> Option<Self> {
        Some(match name {
            "id" => Self::Id,
            "title" => Self::Title,
            "company" => Self::Company,
            "location" => Self::Location,
            "posted_date" => Self::PostedDate,
            "experience_level" => Self::ExperienceLevel,
            "employment_type" | "job_type" => Self::EmploymentType,
            "keyword_tag" | "keywords" => Self::KeywordTag,
            "created_at" => Self::CreatedAt,
            _ => return None,
        })
    }

    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Company => "company",
            Self::Location => "location",
            Self::PostedDate => "posted_date",
            Self::ExperienceLevel => "experience_level",
            Self::EmploymentType => "employment_type",
            Self::KeywordTag => "keyword_tag",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Parsed `order_by` value: `created_at`, `+title`, `-posted_date`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            descending: true,
        }
    }
}

impl SortOrder {
    /// A leading `-` sorts descending, anything else ascending. Unknown
    /// columns fall back to the default order.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let descending = raw.starts_with('-');
        let column = raw.trim_start_matches(['+', '-']);
        match SortKey::from_column(column) {
            Some(key) => Self { key, descending },
            None => Self::default(),
        }
    }

    /// `ORDER BY` body built only from whitelisted column names.
    /// `id` breaks ties so equal timestamps keep insertion order.
    pub(crate) fn to_sql(self) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        if self.key == SortKey::Id {
            format!("id {dir}")
        } else {
            format!("{} {dir}, id {dir}", self.key.column())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_prefixes() {
        assert_eq!(
            SortOrder::parse("-posted_date"),
            SortOrder {
                key: SortKey::PostedDate,
                descending: true
            }
        );
        assert_eq!(
            SortOrder::parse("+title"),
            SortOrder {
                key: SortKey::Title,
                descending: false
            }
        );
        assert!(!SortOrder::parse("company").descending);
    }

    #[test]
    fn unknown_sort_falls_back() {
        assert_eq!(SortOrder::parse("-salary; DROP TABLE jobs"), SortOrder::default());
        assert_eq!(SortOrder::parse(""), SortOrder::default());
    }

    #[test]
    fn limits_are_clamped() {
        let mut f = JobFilter::default();
        assert_eq!(f.effective_limit(), 50);
        f.limit = Some(0);
        assert_eq!(f.effective_limit(), 1);
        f.limit = Some(10_000);
        assert_eq!(f.effective_limit(), 200);
        f.offset = Some(-3);
        assert_eq!(f.effective_offset(), 0);
    }
}
