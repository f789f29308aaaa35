//! Hands pull request events to the poller without waiting for it.
//!
//! ```text
//! ┌─────────────┐     ┌──────────┐  spawn   ┌──────────────────────┐
//! │   axum      │ ──► │ dispatch │ ───────► │ poll(pr) task        │ ──► statuses
//! │  (accepts)  │     └──────────┘          └──────────────────────┘
//! └─────────────┘
//!       │ returns 200 immediately
//!       ▼
//! ```
//!
//! Each event gets its own detached task. Its outcome is observed through
//! logging only; the HTTP response never depends on it.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span};

use super::events::PullRequestEvent;
use crate::coverage::CoverageLookup;
use crate::poller::{CoveragePoller, PollTermination};
use crate::status::StatusReporter;

/// Entry point the HTTP layer calls for every relevant pull request event.
pub trait WebhookDispatcher: Send + Sync {
    /// Starts processing `event` and returns without waiting for it.
    fn on_pull_request_event(&self, event: PullRequestEvent);
}

/// Dispatches each event to a detached [`CoveragePoller::poll`] task.
pub struct PollDispatcher<L, R> {
    poller: Arc<CoveragePoller<L, R>>,
}

impl<L, R> Clone for PollDispatcher<L, R> {
    fn clone(&self) -> Self {
        PollDispatcher {
            poller: Arc::clone(&self.poller),
        }
    }
}

impl<L, R> PollDispatcher<L, R>
where
    L: CoverageLookup + Send + Sync + 'static,
    R: StatusReporter + Send + Sync + 'static,
    R::Error: fmt::Display,
{
    /// Creates a dispatcher sharing `poller` across all spawned polls.
    pub fn new(poller: Arc<CoveragePoller<L, R>>) -> Self {
        PollDispatcher { poller }
    }

    /// Spawns the poll for `event` and returns its handle.
    pub fn spawn(&self, event: PullRequestEvent) -> JoinHandle<PollTermination> {
        let poller = Arc::clone(&self.poller);
        let pr = event.pull_request;
        let span = info_span!(
            "poll_task",
            action = ?event.action,
            head = %pr.head.branch,
            base = %pr.base.branch,
        );

        tokio::spawn(
            async move {
                let termination = poller.poll(&pr).await;
                info!(?termination, "Polling finished");
                termination
            }
            .instrument(span),
        )
    }
}

impl<L, R> WebhookDispatcher for PollDispatcher<L, R>
where
    L: CoverageLookup + Send + Sync + 'static,
    R: StatusReporter + Send + Sync + 'static,
    R::Error: fmt::Display,
{
    fn on_pull_request_event(&self, event: PullRequestEvent) {
        // Detached: the handle is dropped and the task keeps running.
        drop(self.spawn(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollConfig;
    use crate::status::CommitState;
    use crate::test_utils::{RecordingReporter, ScriptedLookup, Step, sample_pr};
    use crate::webhooks::PrAction;

    fn dispatcher(
        lookup: ScriptedLookup,
        reporter: RecordingReporter,
    ) -> PollDispatcher<ScriptedLookup, RecordingReporter> {
        let poller = CoveragePoller::new(lookup, reporter, PollConfig::new());
        PollDispatcher::new(Arc::new(poller))
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_poll_reports_result() {
        let lookup = ScriptedLookup::new()
            .script("abc", &[Step::Ready(85.0)])
            .script("def", &[Step::Ready(80.0)]);
        let reporter = RecordingReporter::new();
        let dispatcher = dispatcher(lookup, reporter.clone());

        let handle = dispatcher.spawn(PullRequestEvent {
            action: PrAction::Opened,
            pull_request: sample_pr("abc", "def"),
        });

        let termination = handle.await.unwrap();
        assert_eq!(termination, PollTermination::Resolved { delta: 5.0, cycles: 1 });
        assert_eq!(reporter.sent()[0].state, CommitState::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_pull_requests_poll_concurrently() {
        let lookup = ScriptedLookup::new()
            .script("h1", &[Step::NotReady, Step::NotReady, Step::Ready(50.0)])
            .script("b1", &[Step::Ready(40.0)])
            .script("h2", &[Step::Ready(30.0)])
            .script("b2", &[Step::Ready(40.0)]);
        let reporter = RecordingReporter::new();
        let dispatcher = dispatcher(lookup, reporter.clone());

        let slow = dispatcher.spawn(PullRequestEvent {
            action: PrAction::Synchronize,
            pull_request: sample_pr("h1", "b1"),
        });
        let fast = dispatcher.spawn(PullRequestEvent {
            action: PrAction::Opened,
            pull_request: sample_pr("h2", "b2"),
        });

        assert_eq!(fast.await.unwrap().cycles(), 1);
        assert_eq!(slow.await.unwrap().cycles(), 3);

        let terminal: Vec<_> = reporter
            .sent()
            .into_iter()
            .filter(|u| u.state.is_terminal())
            .map(|u| (u.sha.to_string(), u.state))
            .collect();
        assert_eq!(
            terminal,
            vec![
                ("h2".to_string(), CommitState::Failure),
                ("h1".to_string(), CommitState::Success),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn on_pull_request_event_does_not_wait() {
        let lookup = ScriptedLookup::new()
            .script("abc", &[Step::NotReady])
            .script("def", &[Step::Ready(80.0)]);
        let reporter = RecordingReporter::new();
        let dispatcher = dispatcher(lookup, reporter.clone());

        // Polling never resolves; returning at all proves the call is detached.
        dispatcher.on_pull_request_event(PullRequestEvent {
            action: PrAction::Opened,
            pull_request: sample_pr("abc", "def"),
        });

        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        assert_eq!(reporter.sent().len(), 3, "pending at t=0s, 1s, 2s");
    }
}
