//! Persisted entities and the validated ingestion input

pub mod alert;
pub mod job;

pub use alert::{AlertAuditRecord, AlertChannel, AlertStatus};
pub use job::{JobPosting, NewJobPosting, ValidationError};
