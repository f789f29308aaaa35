//! GitHub status API errors.
//!
//! Status writes are never retried, so unlike a general-purpose client there
//! is no transient/permanent split here. The error only has to be clear in a
//! log line.

use std::fmt;
use thiserror::Error;

/// A failed status write.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    /// The HTTP status code, if GitHub answered at all.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Wraps an octocrab error, keeping GitHub's status code and message when
    /// the request reached GitHub.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let (status_code, message) = match &err {
            octocrab::Error::GitHub { source, .. } => {
                (Some(source.status_code.as_u16()), source.message.clone())
            }
            other => (None, other.to_string()),
        };

        Self {
            status_code,
            message,
            source: Some(err),
        }
    }

    /// Returns true if GitHub rejected the request itself (4xx).
    pub fn is_rejected(&self) -> bool {
        self.status_code.is_some_and(|code| (400..500).contains(&code))
    }
}
