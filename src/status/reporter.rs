//! The status-writing seam and the three reports built on it.
//!
//! [`StatusReporter`] issues exactly one request per call and never retries.
//! The helpers below are pure projections onto it: they choose the state and
//! description, target the pull request's head commit, and forward the result
//! of the write unchanged so the caller decides what a failure means.

use std::fmt;
use std::future::Future;

use tracing::debug;

use super::format::{PENDING_DESCRIPTION, describe_coverage};
use super::{CommitState, StatusUpdate};
use crate::types::PullRequestRef;

/// Writes commit statuses to the hosting platform.
///
/// Implementations are constructed with their credentials; the update
/// carries everything else.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct RecordingReporter {
///     sent: Mutex<Vec<StatusUpdate>>,
/// }
///
/// impl StatusReporter for RecordingReporter {
///     type Error = String;
///
///     async fn report(&self, update: StatusUpdate) -> Result<(), Self::Error> {
///         self.sent.lock().unwrap().push(update);
///         Ok(())
///     }
/// }
/// ```
pub trait StatusReporter {
    /// The error type returned when a status write fails.
    type Error;

    /// Sends one status update.
    fn report(&self, update: StatusUpdate)
    -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Reports that coverage is still being collected.
pub async fn report_pending<R>(reporter: &R, pr: &PullRequestRef) -> Result<(), R::Error>
where
    R: StatusReporter + Sync,
{
    let update = StatusUpdate::new(pr.status_target(), CommitState::Pending, PENDING_DESCRIPTION);
    reporter.report(update).await
}

/// Reports that the polling cycle failed, using the error's display text.
pub async fn report_error<R, E>(reporter: &R, pr: &PullRequestRef, error: &E) -> Result<(), R::Error>
where
    R: StatusReporter + Sync,
    E: fmt::Display + ?Sized,
{
    let update = StatusUpdate::new(pr.status_target(), CommitState::Error, error.to_string());
    reporter.report(update).await
}

/// Reports the coverage delta (`head - base`, in percentage points).
pub async fn report_coverage<R>(
    reporter: &R,
    pr: &PullRequestRef,
    delta: f64,
) -> Result<(), R::Error>
where
    R: StatusReporter + Sync,
{
    let (state, description) = describe_coverage(delta);
    debug!(sha = %pr.head.sha, %state, delta, "Reporting coverage delta");
    let update = StatusUpdate::new(pr.status_target(), state, description);
    reporter.report(update).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingReporter, arb_percent, arb_pull_request, sample_pr};
    use proptest::prelude::*;

    #[tokio::test]
    async fn pending_targets_head_with_fixed_description() {
        let reporter = RecordingReporter::new();
        let pr = sample_pr("abc", "def");

        report_pending(&reporter, &pr).await.unwrap();

        let sent = reporter.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].sha, pr.head.sha);
        assert_eq!(sent[0].repo, pr.head.repo);
        assert_eq!(sent[0].state, CommitState::Pending);
        assert_eq!(sent[0].description, "Coverage is being collected.");
    }

    #[tokio::test]
    async fn error_uses_display_text() {
        let reporter = RecordingReporter::new();
        let pr = sample_pr("abc", "def");

        report_error(&reporter, &pr, "connection refused").await.unwrap();

        let sent = reporter.sent();
        assert_eq!(sent[0].state, CommitState::Error);
        assert_eq!(sent[0].description, "connection refused");
    }

    #[tokio::test]
    async fn coverage_increase_is_success() {
        let reporter = RecordingReporter::new();
        let pr = sample_pr("abc", "def");

        report_coverage(&reporter, &pr, 5.0).await.unwrap();

        let sent = reporter.sent();
        assert_eq!(sent[0].state, CommitState::Success);
        assert_eq!(sent[0].description, "Coverage increased by 5%");
    }

    #[tokio::test]
    async fn write_failure_is_returned_to_caller() {
        let reporter = RecordingReporter::failing("status API down");
        let pr = sample_pr("abc", "def");

        let result = report_pending(&reporter, &pr).await;

        assert_eq!(result, Err("status API down".to_string()));
        assert_eq!(reporter.sent().len(), 1, "the write was still attempted once");
    }

    proptest! {
        #[test]
        fn coverage_status_always_targets_head(
            pr in arb_pull_request(),
            head in arb_percent(),
            base in arb_percent(),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let reporter = RecordingReporter::new();

            runtime
                .block_on(report_coverage(&reporter, &pr, head - base))
                .unwrap();

            let sent = reporter.sent();
            prop_assert_eq!(sent.len(), 1);
            prop_assert_eq!(&sent[0].sha, &pr.head.sha);
            prop_assert_eq!(&sent[0].repo, &pr.head.repo);
            let expected = if head < base { CommitState::Failure } else { CommitState::Success };
            prop_assert_eq!(sent[0].state, expected);
        }
    }
}
