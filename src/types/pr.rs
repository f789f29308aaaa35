//! Pull request endpoint types.
//!
//! A webhook delivery is reduced to a [`PullRequestRef`]: the two branch tips
//! whose coverage is compared. Nothing else from the payload survives into the
//! polling cycle.

use serde::{Deserialize, Serialize};

use super::ids::{RepoId, Sha};

/// One side (head or base) of a pull request.
///
/// The repository is carried per side because the head of a pull request may
/// live in a fork.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchRef {
    /// The repository the branch lives in.
    pub repo: RepoId,

    /// The branch name, e.g. `main` or `feature/login`.
    pub branch: String,

    /// The commit the branch pointed at when the webhook fired.
    pub sha: Sha,
}

impl BranchRef {
    pub fn new(repo: RepoId, branch: impl Into<String>, sha: impl Into<Sha>) -> Self {
        BranchRef {
            repo,
            branch: branch.into(),
            sha: sha.into(),
        }
    }
}

/// The two endpoints of a pull request, immutable for one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// The proposed commits.
    pub head: BranchRef,

    /// The branch the pull request merges into.
    pub base: BranchRef,
}

impl PullRequestRef {
    pub fn new(head: BranchRef, base: BranchRef) -> Self {
        PullRequestRef { head, base }
    }

    /// The commit statuses are attached to.
    pub fn status_target(&self) -> &BranchRef {
        &self.head
    }
}
