//! The polling loop.
//!
//! One call to [`CoveragePoller::poll`] drives one pull request from
//! "webhook received" to a terminal commit status:
//!
//! ```text
//!            ┌──────────── pending: report, sleep ◄──┐
//!            ▼                                       │
//!   lookup(head) ∥ lookup(base) ──► evaluate ────────┤
//!                                       │            │
//!                    resolved ◄─────────┴──► failed  │
//!                 report_coverage          report_error
//! ```
//!
//! The loop is iterative with one sleep per pending cycle, so a long wait
//! costs no stack. Only "not ready" is retried; a lookup error ends the loop.
//! Status writes are awaited so they stay ordered, but their failures are
//! only logged.

use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::config::PollConfig;
use super::cycle::{CoverageOutcome, evaluate_cycle};
use crate::coverage::CoverageLookup;
use crate::status::{StatusReporter, report_coverage, report_error, report_pending};
use crate::types::PullRequestRef;

/// Why a poll ended without a coverage delta, beyond lookup failures.
#[derive(Debug, Error)]
pub enum PollError {
    /// The configured cycle cap was reached while still pending.
    #[error("Timed out waiting for coverage after {cycles} attempts")]
    Exhausted { cycles: u32 },
}

/// How a call to [`CoveragePoller::poll`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollTermination {
    /// Both sides resolved and the delta was reported.
    Resolved { delta: f64, cycles: u32 },

    /// A lookup failed and an `error` status was reported.
    Failed { cycles: u32 },

    /// The cycle cap was reached and an `error` status was reported.
    Exhausted { cycles: u32 },

    /// The cancellation token fired. No terminal status was written.
    Cancelled { cycles: u32 },
}

impl PollTermination {
    /// Number of lookup cycles that ran.
    pub fn cycles(&self) -> u32 {
        match self {
            PollTermination::Resolved { cycles, .. }
            | PollTermination::Failed { cycles }
            | PollTermination::Exhausted { cycles }
            | PollTermination::Cancelled { cycles } => *cycles,
        }
    }
}

/// Polls coverage for pull requests and reports the result.
///
/// A poller holds no per-pull-request state, so one instance can drive any
/// number of independent polls concurrently.
pub struct CoveragePoller<L, R> {
    lookup: L,
    reporter: R,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<L, R> CoveragePoller<L, R>
where
    L: CoverageLookup + Sync,
    R: StatusReporter + Sync,
    R::Error: fmt::Display,
{
    /// Creates a poller with its own cancellation token.
    pub fn new(lookup: L, reporter: R, config: PollConfig) -> Self {
        Self::new_with_shutdown(lookup, reporter, config, CancellationToken::new())
    }

    /// Creates a poller that stops when `cancel` fires.
    pub fn new_with_shutdown(
        lookup: L,
        reporter: R,
        config: PollConfig,
        cancel: CancellationToken,
    ) -> Self {
        CoveragePoller {
            lookup,
            reporter,
            config,
            cancel,
        }
    }

    /// Returns the shutdown token.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Polls until coverage resolves for both sides of `pr`, a lookup fails,
    /// the cycle cap is reached, or the poller is cancelled.
    #[instrument(
        skip(self, pr),
        fields(repo = %pr.head.repo, head = %pr.head.sha.short(), base = %pr.base.sha.short())
    )]
    pub async fn poll(&self, pr: &PullRequestRef) -> PollTermination {
        let mut cycles = 0u32;

        loop {
            let lookups = async {
                tokio::join!(self.lookup.lookup(&pr.head), self.lookup.lookup(&pr.base))
            };
            let (head, base) = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    info!(cycles, "Polling cancelled");
                    return PollTermination::Cancelled { cycles };
                }
                results = lookups => results,
            };
            cycles += 1;

            match evaluate_cycle(head, base) {
                CoverageOutcome::Resolved { delta } => {
                    info!(cycles, delta, "Coverage resolved");
                    log_terminal_write(report_coverage(&self.reporter, pr, delta).await);
                    return PollTermination::Resolved { delta, cycles };
                }
                CoverageOutcome::Failed(err) => {
                    if err.is_transport() {
                        warn!(cycles, error = %err, "Coverage service request failed");
                    } else {
                        warn!(cycles, error = %err, "Coverage lookup failed");
                    }
                    log_terminal_write(report_error(&self.reporter, pr, &err).await);
                    return PollTermination::Failed { cycles };
                }
                CoverageOutcome::Pending if self.config.is_exhausted(cycles) => {
                    let err = PollError::Exhausted { cycles };
                    warn!(cycles, "Giving up on coverage");
                    log_terminal_write(report_error(&self.reporter, pr, &err).await);
                    return PollTermination::Exhausted { cycles };
                }
                CoverageOutcome::Pending => {
                    debug!(cycles, "Coverage not yet available");
                    if let Err(e) = report_pending(&self.reporter, pr).await {
                        warn!(error = %e, "Failed to report pending status, polling continues");
                    }
                }
            }

            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    info!(cycles, "Polling cancelled");
                    return PollTermination::Cancelled { cycles };
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}

/// Logs the outcome of the final status write. It is never retried.
fn log_terminal_write<E: fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to report final status");
    }
}
