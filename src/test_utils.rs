//! Shared test utilities: scripted collaborators, fixtures and arbitrary
//! generators for property-based testing.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::coverage::{CoverageLookup, CoverageReading, LookupError};
use crate::status::{StatusReporter, StatusUpdate};
use crate::types::{BranchRef, PullRequestRef, RepoId, Sha};

// ─── Fixtures ───

/// A pull request in `octocat/app` from `feature@head_sha` into `main@base_sha`.
pub fn sample_pr(head_sha: &str, base_sha: &str) -> PullRequestRef {
    PullRequestRef::new(
        BranchRef::new(RepoId::new("octocat", "app"), "feature", head_sha),
        BranchRef::new(RepoId::new("octocat", "app"), "main", base_sha),
    )
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_fake_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// ─── Status reporter ───

/// Records every status update; optionally fails every write.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    sent: Arc<Mutex<Vec<StatusUpdate>>>,
    fail_with: Option<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter whose writes are recorded and then fail with `message`.
    pub fn failing(message: &str) -> Self {
        RecordingReporter {
            sent: Arc::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<StatusUpdate> {
        self.sent.lock().unwrap().clone()
    }
}

impl StatusReporter for RecordingReporter {
    type Error = String;

    fn report(&self, update: StatusUpdate) -> impl Future<Output = Result<(), String>> + Send {
        self.sent.lock().unwrap().push(update);
        let result = match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        };
        async move { result }
    }
}

// ─── Coverage lookup ───

/// One scripted answer from [`ScriptedLookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Ready(f64),
    NotReady,
    RepoNotFound,
    /// An HTTP failure with this status code.
    Unavailable(u16),
}

impl Step {
    fn into_result(self, branch: &BranchRef) -> Result<CoverageReading, LookupError> {
        match self {
            Step::Ready(percent) => Ok(CoverageReading::Ready(percent)),
            Step::NotReady => Ok(CoverageReading::NotReady),
            Step::RepoNotFound => Err(LookupError::RepoNotFound {
                full_name: branch.repo.full_name(),
            }),
            Step::Unavailable(status) => Err(LookupError::UnexpectedStatus {
                status,
                path: format!("/repos/x/branches/{}", branch.branch),
            }),
        }
    }
}

/// Answers lookups from a per-commit script. The last step repeats forever.
#[derive(Clone, Default)]
pub struct ScriptedLookup {
    scripts: Arc<Mutex<HashMap<Sha, VecDeque<Step>>>>,
    calls: Arc<Mutex<HashMap<Sha, u32>>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the answers for lookups of `sha`, in order.
    pub fn script(self, sha: &str, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(Sha::new(sha), steps.iter().copied().collect());
        self
    }

    /// Number of lookups made for `sha`.
    pub fn calls(&self, sha: &str) -> u32 {
        self.calls
            .lock()
            .unwrap()
            .get(&Sha::new(sha))
            .copied()
            .unwrap_or(0)
    }
}

impl CoverageLookup for ScriptedLookup {
    fn lookup(
        &self,
        branch: &BranchRef,
    ) -> impl Future<Output = Result<CoverageReading, LookupError>> + Send {
        *self.calls.lock().unwrap().entry(branch.sha.clone()).or_default() += 1;

        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get_mut(&branch.sha)
                .unwrap_or_else(|| panic!("no script for {}", branch.sha));
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                *script.front().unwrap()
            }
        };

        let result = step.into_result(branch);
        async move { result }
    }
}

// ─── Generators ───

pub fn arb_sha() -> impl Strategy<Value = Sha> {
    "[0-9a-f]{40}".prop_map(Sha::new)
}

pub fn arb_branch_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9/-]{0,30}".prop_map(String::from)
}

pub fn arb_percent() -> impl Strategy<Value = f64> {
    0.0f64..=100.0
}

pub fn arb_pull_request() -> impl Strategy<Value = PullRequestRef> {
    (arb_branch_name(), arb_sha(), arb_branch_name(), arb_sha()).prop_map(
        |(head_branch, head_sha, base_branch, base_sha)| {
            let repo = RepoId::new("octocat", "app");
            PullRequestRef::new(
                BranchRef::new(repo.clone(), head_branch, head_sha),
                BranchRef::new(repo, base_branch, base_sha),
            )
        },
    )
}
