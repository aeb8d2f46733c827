use thiserror::Error;

use crate::types::AttemptOutcome;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Network error occurred while requesting {url}: {message}")]
    Network { url: String, message: String },

    #[error("Server returned {status}: {status_text} ({url})")]
    Http {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("All requests failed")]
    NoEndpoints,
}

impl SubmitError {
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            SubmitError::Http { .. } => AttemptOutcome::HttpError,
            SubmitError::Network { .. } | SubmitError::NoEndpoints => AttemptOutcome::NetworkError,
        }
    }
}
