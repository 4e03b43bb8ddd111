use serde::Serialize;

use super::{JobStore, StoreResult};

/// Autocomplete values for the listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Titles and keyword tags, merged
    pub titles: Vec<String>,
    pub companies: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    KeywordTag,
    Company,
    Location,
}

impl Field {
    fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::KeywordTag => "keyword_tag",
            Self::Company => "company",
            Self::Location => "location",
        }
    }
}

impl JobStore {
    /// Up to `limit` most frequent distinct values containing `q`, per field
    pub async fn suggestions(&self, q: &str, limit: usize) -> StoreResult<Suggestions> {
        let limit = limit.max(1);
        let titles = self.top_values(Field::Title, q, limit).await?;
        let tags = self.top_values(Field::KeywordTag, q, limit).await?;

        let mut merged: Vec<(String, i64)> = titles.into_iter().chain(tags).collect();
        // Stable sort keeps titles ahead of tags at equal counts
        merged.sort_by(|a, b| b.1.cmp(&a.1));
        let mut seen = std::collections::HashSet::new();
        let titles = merged
            .into_iter()
            .map(|(value, _)| value)
            .filter(|value| seen.insert(value.to_lowercase()))
            .take(limit)
            .collect();

        Ok(Suggestions {
            titles,
            companies: self.values_only(Field::Company, q, limit).await?,
            locations: self.values_only(Field::Location, q, limit).await?,
        })
    }

    async fn values_only(&self, field: Field, q: &str, limit: usize) -> StoreResult<Vec<String>> {
        Ok(self
            .top_values(field, q, limit)
            .await?
            .into_iter()
            .map(|(value, _)| value)
            .collect())
    }

    async fn top_values(&self, field: Field, q: &str, limit: usize) -> StoreResult<Vec<(String, i64)>> {
        let column = field.column();
        let sql = format!(
            "SELECT {column} AS value, COUNT(*) AS hits FROM jobs \
             WHERE {column} IS NOT NULL AND {column} <> '' AND {column} LIKE ? \
             GROUP BY {column} ORDER BY hits DESC, value ASC LIMIT ?"
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .bind(format!("%{}%", q.trim()))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
