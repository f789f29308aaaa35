//! Octocrab-backed status writer.
//!
//! Statuses are created with `POST /repos/{owner}/{repo}/statuses/{sha}`.
//! Every status links to the repository's Code Climate page and is tagged with
//! [`STATUS_CONTEXT`].

use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::error::GitHubApiError;
use crate::status::{STATUS_CONTEXT, StatusReporter, StatusUpdate};
use crate::types::RepoId;

/// Request body of the create-status endpoint.
#[derive(Debug, Serialize)]
struct CreateStatusRequest<'a> {
    state: &'static str,
    target_url: String,
    description: &'a str,
    context: &'static str,
}

/// Writes commit statuses through the GitHub REST API.
#[derive(Clone)]
pub struct GitHubStatusClient {
    /// The underlying octocrab client.
    client: Octocrab,

    /// Base of the status link, e.g. `https://codeclimate.com/github`.
    target_url_base: String,
}

impl GitHubStatusClient {
    /// Creates a status writer from a pre-configured Octocrab instance.
    pub fn new(client: Octocrab, target_url_base: impl Into<String>) -> Self {
        let target_url_base = target_url_base.into().trim_end_matches('/').to_string();
        Self {
            client,
            target_url_base,
        }
    }

    /// Creates a status writer from a GitHub token.
    pub fn from_token(
        token: impl Into<String>,
        target_url_base: impl Into<String>,
    ) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client, target_url_base))
    }

    /// Returns the link attached to statuses for `repo`.
    pub fn target_url(&self, repo: &RepoId) -> String {
        format!("{}/{}", self.target_url_base, repo)
    }
}

impl StatusReporter for GitHubStatusClient {
    type Error = GitHubApiError;

    async fn report(&self, update: StatusUpdate) -> Result<(), GitHubApiError> {
        let url = format!(
            "/repos/{}/{}/statuses/{}",
            update.repo.owner, update.repo.repo, update.sha
        );
        let body = CreateStatusRequest {
            state: update.state.as_api_str(),
            target_url: self.target_url(&update.repo),
            description: &update.description,
            context: STATUS_CONTEXT,
        };

        let result: Result<serde_json::Value, _> = self.client.post(&url, Some(&body)).await;

        match result {
            Ok(_) => {
                debug!(
                    repo = %update.repo,
                    sha = %update.sha.short(),
                    state = %update.state,
                    "Commit status written"
                );
                Ok(())
            }
            Err(e) => {
                let err = GitHubApiError::from_octocrab(e);
                if err.is_rejected() {
                    // Usually a token without `repo:status` or an unknown commit.
                    error!(
                        repo = %update.repo,
                        sha = %update.sha.short(),
                        state = %update.state,
                        error = %err,
                        "GitHub rejected commit status"
                    );
                } else {
                    warn!(
                        repo = %update.repo,
                        sha = %update.sha.short(),
                        state = %update.state,
                        error = %err,
                        "Commit status write failed"
                    );
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for GitHubStatusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStatusClient")
            .field("target_url_base", &self.target_url_base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CommitState;
    use crate::test_utils::spawn_fake_server;
    use crate::types::{BranchRef, Sha};
    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<(String, String, String, Value)>>>;

    fn fake_github(received: Received, status: StatusCode) -> Router {
        Router::new()
            .route(
                "/repos/{owner}/{repo}/statuses/{sha}",
                post(
                    |State((received, status)): State<(Received, StatusCode)>,
                     Path((owner, repo, sha)): Path<(String, String, String)>,
                     Json(body): Json<Value>| async move {
                        received.lock().unwrap().push((owner, repo, sha, body));
                        if status.is_success() {
                            (status, Json(json!({ "id": 1, "state": "pending" })))
                        } else {
                            (
                                status,
                                Json(json!({
                                    "message": "Validation Failed",
                                    "documentation_url": "https://docs.github.com/rest"
                                })),
                            )
                        }
                    },
                ),
            )
            .with_state((received, status))
    }

    fn client_for(base: &str) -> GitHubStatusClient {
        let octocrab = Octocrab::builder()
            .base_uri(base)
            .unwrap()
            .personal_token("gh-token".to_string())
            .build()
            .unwrap();
        GitHubStatusClient::new(octocrab, "https://codeclimate.com/github/")
    }

    fn update(state: CommitState, description: &str) -> StatusUpdate {
        let target = BranchRef::new(RepoId::new("octocat", "app"), "feature", "abc123");
        StatusUpdate::new(&target, state, description)
    }

    #[tokio::test]
    async fn target_url_links_to_repository() {
        let client = client_for("http://127.0.0.1:9");
        assert_eq!(
            client.target_url(&RepoId::new("octocat", "app")),
            "https://codeclimate.com/github/octocat/app"
        );
    }

    #[tokio::test]
    async fn report_posts_status_body() {
        let received = Received::default();
        let base = spawn_fake_server(fake_github(received.clone(), StatusCode::CREATED)).await;
        let client = client_for(&base);

        client
            .report(update(CommitState::Success, "Coverage increased by 5%"))
            .await
            .unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (owner, repo, sha, body) = &received[0];
        assert_eq!((owner.as_str(), repo.as_str()), ("octocat", "app"));
        assert_eq!(Sha::new(sha.as_str()), Sha::new("abc123"));
        assert_eq!(body["state"], "success");
        assert_eq!(body["description"], "Coverage increased by 5%");
        assert_eq!(body["context"], "codeclimate/coverage");
        assert_eq!(body["target_url"], "https://codeclimate.com/github/octocat/app");
    }

    #[tokio::test]
    async fn rejected_write_is_an_error() {
        let received = Received::default();
        let base = spawn_fake_server(fake_github(
            received.clone(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
        .await;
        let client = client_for(&base);

        let err = client
            .report(update(CommitState::Pending, "Coverage is being collected."))
            .await
            .unwrap_err();

        assert_eq!(received.lock().unwrap().len(), 1, "no retry on failure");
        assert_eq!(err.status_code, Some(422));
        assert!(err.is_rejected());
    }
}
