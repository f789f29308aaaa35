//! Coverage measurements as recorded by the coverage service.

use serde::{Deserialize, Serialize};

use super::ids::Sha;

/// The coverage recorded for a branch's most recent processed commit.
///
/// A snapshot describes `commit_sha`, which is not necessarily the commit the
/// webhook reported. Use [`CoverageSnapshot::is_for`] before trusting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSnapshot {
    /// The commit this measurement belongs to.
    pub commit_sha: Sha,

    /// Percentage of lines covered, 0.0 to 100.0.
    pub covered_percent: f64,
}

impl CoverageSnapshot {
    pub fn new(commit_sha: impl Into<Sha>, covered_percent: f64) -> Self {
        CoverageSnapshot {
            commit_sha: commit_sha.into(),
            covered_percent,
        }
    }

    /// Returns true if this snapshot was measured at exactly `sha`.
    pub fn is_for(&self, sha: &Sha) -> bool {
        self.commit_sha == *sha
    }
}
