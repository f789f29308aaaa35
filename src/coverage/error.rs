//! Coverage lookup errors.
//!
//! Only genuine failures live here. A snapshot for an older commit is
//! [`CoverageReading::NotReady`](super::CoverageReading::NotReady), not an
//! error, and is the only outcome the poller retries.

use thiserror::Error;

/// A coverage lookup that cannot succeed in this polling cycle.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Code Climate has no repository matching the full name.
    #[error("RepoNotFound: no Code Climate repository matches {full_name}")]
    RepoNotFound { full_name: String },

    /// Code Climate answered with a non-success HTTP status.
    #[error("Code Climate returned HTTP {status} for {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// The request could not be sent or its body could not be decoded.
    #[error("Code Climate request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LookupError {
    /// Returns true for failures of the HTTP exchange itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LookupError::Transport(_) | LookupError::UnexpectedStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_not_found_names_the_repository() {
        let err = LookupError::RepoNotFound {
            full_name: "octocat/app".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("RepoNotFound"));
        assert!(message.contains("octocat/app"));
        assert!(!err.is_transport());
    }

    #[test]
    fn unexpected_status_is_transport() {
        let err = LookupError::UnexpectedStatus {
            status: 503,
            path: "/repos".to_string(),
        };
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Code Climate returned HTTP 503 for /repos");
    }
}
