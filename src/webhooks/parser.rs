//! GitHub webhook payload parser.
//!
//! # Parsing Strategy
//!
//! 1. The event type is determined from the `X-GitHub-Event` header
//! 2. Event types other than `pull_request` return `Ok(None)`
//! 3. Actions other than `opened`/`synchronize` return `Ok(None)` before the
//!    rest of the payload is inspected
//! 4. A relevant event missing any endpoint field is a [`ParseError`]

use serde::Deserialize;
use thiserror::Error;

use super::events::{PrAction, PullRequestEvent};
use crate::types::{BranchRef, PullRequestRef, RepoId, Sha};

/// Error type for malformed webhook payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON or has the wrong shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the poller needs is absent or null.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Field has invalid value (e.g., a repository name without an owner).
    #[error("invalid field value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Parses a webhook payload into a pull request event.
///
/// # Returns
///
/// * `Ok(Some(event))` - A `pull_request` event with action `opened` or `synchronize`
/// * `Ok(None)` - Any other event type or action (ignored, not an error)
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use coverage_status::webhooks::parse_webhook;
///
/// let payload = br#"{
///     "action": "opened",
///     "pull_request": {
///         "head": { "repo": { "full_name": "octocat/app" }, "ref": "feature", "sha": "abc" },
///         "base": { "repo": { "full_name": "octocat/app" }, "ref": "main", "sha": "def" }
///     }
/// }"#;
///
/// let event = parse_webhook("pull_request", payload).unwrap().unwrap();
/// assert_eq!(event.pull_request.base.branch, "main");
/// ```
pub fn parse_webhook(
    event_type: &str,
    payload: &[u8],
) -> Result<Option<PullRequestEvent>, ParseError> {
    match event_type {
        "pull_request" => parse_pull_request(payload),
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures
//
// Everything is optional so that a missing field produces a MissingField
// error naming it, rather than serde's positional message.
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: Option<String>,
    pull_request: Option<RawPullRequest>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    head: Option<RawBranch>,
    base: Option<RawBranch>,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    repo: Option<RawRepo>,
    #[serde(rename = "ref")]
    ref_name: Option<String>,
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    full_name: Option<String>,
}

/// Field paths, one set per endpoint, for error messages.
struct BranchFields {
    branch: &'static str,
    repo: &'static str,
    ref_name: &'static str,
    sha: &'static str,
}

const HEAD_FIELDS: BranchFields = BranchFields {
    branch: "pull_request.head",
    repo: "pull_request.head.repo.full_name",
    ref_name: "pull_request.head.ref",
    sha: "pull_request.head.sha",
};

const BASE_FIELDS: BranchFields = BranchFields {
    branch: "pull_request.base",
    repo: "pull_request.base.repo.full_name",
    ref_name: "pull_request.base.ref",
    sha: "pull_request.base.sha",
};

fn parse_pull_request(payload: &[u8]) -> Result<Option<PullRequestEvent>, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;

    let action = raw
        .action
        .ok_or(ParseError::MissingField { field: "action" })?;
    let Some(action) = PrAction::from_api_str(&action) else {
        return Ok(None);
    };

    let pull_request = raw.pull_request.ok_or(ParseError::MissingField {
        field: "pull_request",
    })?;

    let head = branch_ref(pull_request.head, &HEAD_FIELDS)?;
    let base = branch_ref(pull_request.base, &BASE_FIELDS)?;

    Ok(Some(PullRequestEvent {
        action,
        pull_request: PullRequestRef::new(head, base),
    }))
}

fn branch_ref(raw: Option<RawBranch>, fields: &BranchFields) -> Result<BranchRef, ParseError> {
    let raw = raw.ok_or(ParseError::MissingField {
        field: fields.branch,
    })?;

    let full_name = raw
        .repo
        .and_then(|r| r.full_name)
        .ok_or(ParseError::MissingField { field: fields.repo })?;
    let repo = RepoId::parse_full_name(&full_name).ok_or(ParseError::InvalidField {
        field: fields.repo,
        value: full_name.clone(),
    })?;

    let branch = raw
        .ref_name
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField {
            field: fields.ref_name,
        })?;
    let sha = raw
        .sha
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField { field: fields.sha })?;

    Ok(BranchRef::new(repo, branch, Sha::new(sha)))
}
