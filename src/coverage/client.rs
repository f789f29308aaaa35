//! Code Climate API client.
//!
//! Two endpoints are used, both authenticated with the `api_token` query
//! parameter:
//!
//! - `GET {api}/repos` lists repositories as `{"data": [{"id", "url", "github_slug"}]}`
//! - `GET {api}/repos/{id}/branches/{branch}` returns
//!   `{"data": {"last_snapshot": {"commit_sha", "covered_percent"}}}`

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::LookupError;
use crate::types::CoverageSnapshot;

/// Per-request timeout. A hung request is a transport failure, not a pending cycle.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Code Climate's identifier for a repository.
///
/// The API has returned both string and numeric ids over time; both are
/// normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawRepoId")]
pub struct CoverageRepoId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRepoId {
    Text(String),
    Number(u64),
}

impl From<RawRepoId> for CoverageRepoId {
    fn from(raw: RawRepoId) -> Self {
        match raw {
            RawRepoId::Text(s) => CoverageRepoId(s),
            RawRepoId::Number(n) => CoverageRepoId(n.to_string()),
        }
    }
}

impl fmt::Display for CoverageRepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the repository directory.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub id: CoverageRepoId,

    /// Source URL, e.g. `https://github.com/octocat/hello-world`.
    #[serde(default)]
    pub url: Option<String>,

    /// `owner/repo`, when the API provides it.
    #[serde(default)]
    pub github_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(default)]
    last_snapshot: Option<RawSnapshot>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    commit_sha: String,
    #[serde(default)]
    covered_percent: Option<f64>,
}

/// HTTP client for the Code Climate API.
///
/// The access token is injected at construction and never mutated.
#[derive(Clone)]
pub struct CodeClimateClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl CodeClimateClient {
    /// Creates a client for the API rooted at `api_url` (no trailing slash needed).
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("coverage-status/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::from_reqwest(http, api_url, token))
    }

    /// Creates a client from a pre-configured reqwest client.
    pub fn from_reqwest(
        http: reqwest::Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        CodeClimateClient {
            http,
            api_url,
            token: token.into(),
        }
    }

    /// Lists every repository visible to the token.
    pub async fn list_repos(&self) -> Result<Vec<RepoEntry>, LookupError> {
        let envelope: Envelope<Vec<RepoEntry>> = self.get_json("/repos".to_string()).await?;
        debug!(count = envelope.data.len(), "Listed Code Climate repositories");
        Ok(envelope.data)
    }

    /// Fetches the latest snapshot of `branch`.
    ///
    /// Returns `Ok(None)` when the branch has no snapshot yet, or its latest
    /// snapshot has no coverage figure.
    pub async fn branch_snapshot(
        &self,
        repo_id: &CoverageRepoId,
        branch: &str,
    ) -> Result<Option<CoverageSnapshot>, LookupError> {
        // Branch names may contain '/', which must stay inside one path segment.
        let path = format!(
            "/repos/{}/branches/{}",
            urlencoding::encode(&repo_id.0),
            urlencoding::encode(branch)
        );
        let envelope: Envelope<RawBranch> = self.get_json(path).await?;

        Ok(envelope.data.last_snapshot.and_then(|raw| {
            raw.covered_percent
                .map(|percent| CoverageSnapshot::new(raw.commit_sha, percent))
        }))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T, LookupError> {
        let url = format!("{}{}", self.api_url, path);
        trace!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(&[("api_token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UnexpectedStatus {
                status: status.as_u16(),
                path,
            });
        }

        Ok(response.json().await?)
    }
}

impl fmt::Debug for CodeClimateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeClimateClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
