use html_escape::{encode_single_quoted_attribute, encode_text};

use crate::models::JobPosting;

/// Rendered alert content for one posting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAlert {
    pub job_id: i64,
    pub subject: String,
    pub html_body: String,
    /// Telegram text, HTML-escaped for `parse_mode=HTML`
    pub chat_text: String,
    /// The same text unescaped; this is what the audit row keeps
    pub chat_plain: String,
}

impl JobAlert {
    #[must_use]
    pub fn for_posting(job: &JobPosting) -> Self {
        let company = job.company.as_deref().unwrap_or_default();
        let location = job.location.as_deref().unwrap_or_default();
        Self {
            job_id: job.id,
            subject: format!("New Job: {} at {company}", job.title).trim().to_string(),
            html_body: format!(
                "<b>{}</b> at {}<br/>{}<br/><a href='{}'>Open</a>",
                encode_text(&job.title),
                encode_text(company),
                encode_text(location),
                encode_single_quoted_attribute(&job.source_link),
            ),
            chat_text: format!(
                "New Job: {} at {}\n{}\n{}",
                encode_text(&job.title),
                encode_text(company),
                encode_text(location),
                encode_text(&job.source_link),
            ),
            chat_plain: format!(
                "New Job: {} at {company}\n{location}\n{}",
                job.title, job.source_link
            ),
        }
    }
}
