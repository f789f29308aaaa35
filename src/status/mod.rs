//! Commit statuses posted back to the pull request.
//!
//! Every status this bot writes carries the same [`STATUS_CONTEXT`], so a new
//! status replaces the previous one in GitHub's UI rather than piling up next
//! to it.
//!
//! # Lifecycle
//!
//! ```text
//! pending* ──► success | failure | error
//! ```
//!
//! `pending` is re-sent on every polling cycle that finds no data. Exactly one
//! terminal status follows.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{BranchRef, RepoId, Sha};

pub mod format;
pub mod reporter;

pub use format::{
    GITHUB_DESCRIPTION_LIMIT, PENDING_DESCRIPTION, UNCHANGED_DESCRIPTION, describe_coverage,
    truncate_description,
};
pub use reporter::{StatusReporter, report_coverage, report_error, report_pending};

/// Context string identifying this integration's statuses on a commit.
pub const STATUS_CONTEXT: &str = "codeclimate/coverage";

/// The state of a commit status, as accepted by GitHub's status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitState {
    Pending,
    Success,
    Failure,
    Error,
}

impl CommitState {
    /// Returns the string GitHub expects in the `state` field.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            CommitState::Pending => "pending",
            CommitState::Success => "success",
            CommitState::Failure => "failure",
            CommitState::Error => "error",
        }
    }

    /// Returns true for the states that end a polling cycle.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CommitState::Pending)
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// A single status write: which commit, which state, what to say.
///
/// Built fresh for every report. Nothing compares it against the status that
/// is already on the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Repository owning the commit.
    pub repo: RepoId,

    /// The commit the status is attached to.
    pub sha: Sha,

    pub state: CommitState,

    /// Human-readable text, already truncated to GitHub's limit.
    pub description: String,
}

impl StatusUpdate {
    /// Creates an update targeting the tip of `target`.
    pub fn new(target: &BranchRef, state: CommitState, description: impl Into<String>) -> Self {
        StatusUpdate {
            repo: target.repo.clone(),
            sha: target.sha.clone(),
            state,
            description: truncate_description(description.into()),
        }
    }
}
