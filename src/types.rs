use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    /// Space separated
    #[serde(default)]
    pub tags: String,
}

impl BookmarkDraft {
    /// Field order matches what the server's bookmarklet form expects.
    pub fn form_fields(&self) -> [(&str, &str); 4] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("tags", self.tags.as_str()),
            ("url", self.url.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    NetworkError,
    HttpError,
    /// Popup was never acknowledged; treated as saved.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub endpoint: Url,
    pub method: Method,
    pub outcome: AttemptOutcome,
}

#[derive(Debug)]
pub struct Submission {
    pub endpoint: Url,
    pub method: Method,
    pub attempts: Vec<SubmissionAttempt>,
}

impl Submission {
    /// False when the winning attempt was an unacknowledged popup.
    pub fn is_confirmed(&self) -> bool {
        self.attempts
            .last()
            .map(|attempt| attempt.outcome == AttemptOutcome::Success)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl PageMetadata {
    /// Tab level information used when the page itself cannot be read.
    pub fn fallback(url: &str, title: Option<&str>) -> PageMetadata {
        PageMetadata {
            title: title.unwrap_or(url).to_string(),
            description: String::new(),
            url: url.to_string(),
        }
    }

    pub fn into_draft(self, tags: String) -> BookmarkDraft {
        BookmarkDraft {
            title: self.title,
            description: self.description,
            url: self.url,
            tags,
        }
    }
}
