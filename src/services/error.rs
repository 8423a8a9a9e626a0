use thiserror::Error;

/// A data source could not produce usable data this cycle.
///
/// Always recoverable: the orchestrator logs it and advances to the next
/// source, and indicator enrichment simply omits the affected values.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(reqwest::Error),

    #[error("{source_id} answered with status {status}")]
    Status { source_id: &'static str, status: u16 },

    #[error("invalid payload from {source_id}: {reason}")]
    InvalidPayload {
        source_id: &'static str,
        reason: String,
    },
}

impl SourceError {
    pub fn invalid(source_id: &'static str, reason: impl Into<String>) -> Self {
        SourceError::InvalidPayload {
            source_id,
            reason: reason.into(),
        }
    }
}

/// Request URLs carry API keys in the query string, so they are dropped.
impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(e.without_url())
    }
}
