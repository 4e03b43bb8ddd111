//! CSV and JSON snapshots of a run's records

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extractor::RawListingRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths of the two sibling files written by one export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Flat view of a record; one row per posting
#[derive(Debug, Clone, Serialize)]
struct ExportRow<'a> {
    title: Option<&'a str>,
    company: Option<&'a str>,
    location: Option<&'a str>,
    posted_date: Option<&'a str>,
    source_link: &'a str,
    keyword_tag: Option<&'a str>,
    experience_level: Option<&'a str>,
    employment_type: Option<&'a str>,
    description_text: Option<&'a str>,
    enrichment_error: Option<&'a str>,
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a RawListingRecord) -> Self {
        let details = record.enrichment.details();
        Self {
            title: record.title.as_deref(),
            company: record.company.as_deref(),
            location: record.location.as_deref(),
            posted_date: record.posted_date.as_deref(),
            source_link: &record.source_link,
            keyword_tag: record.keyword_tag.as_deref(),
            experience_level: details.and_then(|d| d.experience_level.as_deref()),
            employment_type: details.and_then(|d| d.employment_type.as_deref()),
            description_text: details.and_then(|d| d.description_text.as_deref()),
            enrichment_error: match &record.enrichment {
                crate::extractor::Enrichment::Failed(e) => Some(e.as_str()),
                _ => None,
            },
        }
    }
}

/// JSON keeps the criteria list that the CSV flattens
#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(flatten)]
    row: ExportRow<'a>,
    criteria: &'a [String],
}

/// `"{keywords}-{location}"` with spaces and path separators replaced
#[must_use]
pub fn export_base_name(keywords: &str, location: &str) -> String {
    format!("{keywords}-{location}")
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Write `{base}-{YYYYMMDD-HHMMSS}.csv` and `.json` into `dir`, creating it
/// if needed.
pub fn export_records(
    dir: &Path,
    base: &str,
    records: &[RawListingRecord],
    at: DateTime<Utc>,
) -> Result<ExportPaths, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let stamp = at.format("%Y%m%d-%H%M%S");
    let paths = ExportPaths {
        csv: dir.join(format!("{base}-{stamp}.csv")),
        json: dir.join(format!("{base}-{stamp}.json")),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(&paths.csv)?;
    for record in records {
        writer.serialize(ExportRow::from_record(record))?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: paths.csv.clone(),
        source,
    })?;

    let json: Vec<JsonRecord<'_>> = records
        .iter()
        .map(|record| JsonRecord {
            row: ExportRow::from_record(record),
            criteria: record
                .enrichment
                .details()
                .map_or(&[][..], |d| d.criteria.as_slice()),
        })
        .collect();
    fs::write(&paths.json, serde_json::to_vec_pretty(&json)?).map_err(|source| ExportError::Io {
        path: paths.json.clone(),
        source,
    })?;

    tracing::info!(
        csv = %paths.csv.display(),
        json = %paths.json.display(),
        records = records.len(),
        "Exported run"
    );
    Ok(paths)
}
