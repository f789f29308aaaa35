//! Resolving a branch to a coverage percentage.

use std::future::Future;

use tracing::{debug, instrument};

use super::client::{CodeClimateClient, CoverageRepoId, RepoEntry};
use super::error::LookupError;
use crate::types::{BranchRef, CoverageSnapshot, RepoId};

/// The answer to a single coverage lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageReading {
    /// Coverage measured at exactly the queried commit.
    Ready(f64),

    /// The service has not processed the queried commit yet.
    NotReady,
}

/// Resolves branch tips to coverage percentages.
pub trait CoverageLookup {
    /// Looks up coverage for the commit `branch.sha`.
    ///
    /// Implementations must answer [`CoverageReading::NotReady`] whenever the
    /// best available measurement belongs to a different commit.
    fn lookup(
        &self,
        branch: &BranchRef,
    ) -> impl Future<Output = Result<CoverageReading, LookupError>> + Send;
}

impl CoverageLookup for CodeClimateClient {
    #[instrument(
        skip(self, branch),
        fields(repo = %branch.repo, branch = %branch.branch, sha = %branch.sha.short())
    )]
    async fn lookup(&self, branch: &BranchRef) -> Result<CoverageReading, LookupError> {
        let repos = self.list_repos().await?;
        let repo_id = find_repo_id(&repos, &branch.repo)
            .ok_or_else(|| LookupError::RepoNotFound {
                full_name: branch.repo.full_name(),
            })?
            .clone();

        let snapshot = self.branch_snapshot(&repo_id, &branch.branch).await?;
        let reading = reading_for(branch, snapshot.as_ref());

        debug!(%repo_id, ?reading, "Coverage lookup finished");
        Ok(reading)
    }
}

/// Finds the Code Climate id of `repo` in the repository directory.
///
/// Matching is exact on `owner/repo`, ASCII-case-insensitive as GitHub names
/// are. An entry matches on its `github_slug` if present, otherwise on the
/// last two path segments of its `url`.
pub fn find_repo_id<'a>(repos: &'a [RepoEntry], repo: &RepoId) -> Option<&'a CoverageRepoId> {
    let full_name = repo.full_name();
    repos
        .iter()
        .find(|entry| {
            entry_full_name(entry).is_some_and(|name| name.eq_ignore_ascii_case(&full_name))
        })
        .map(|entry| &entry.id)
}

fn entry_full_name(entry: &RepoEntry) -> Option<String> {
    if let Some(slug) = &entry.github_slug {
        return Some(slug.clone());
    }

    let url = entry.url.as_deref()?.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    // Accepts both https://github.com/o/r and git@github.com:o/r.
    let mut segments = url.rsplit(['/', ':']);
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let owner = segments.next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", owner, repo))
}

/// Applies the staleness rule to a branch's latest snapshot.
///
/// A snapshot recorded for any commit other than `branch.sha` means the
/// service has not caught up with the webhook yet.
pub fn reading_for(branch: &BranchRef, snapshot: Option<&CoverageSnapshot>) -> CoverageReading {
    match snapshot {
        Some(snapshot) if snapshot.is_for(&branch.sha) => {
            CoverageReading::Ready(snapshot.covered_percent)
        }
        Some(snapshot) => {
            debug!(
                expected = %branch.sha.short(),
                found = %snapshot.commit_sha.short(),
                "Snapshot is for a different commit"
            );
            CoverageReading::NotReady
        }
        None => CoverageReading::NotReady,
    }
}
