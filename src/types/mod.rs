//! Core domain types for the coverage status bot.
//!
//! These are the values that flow from the webhook payload through the
//! poller to the status API.

pub mod coverage;
pub mod ids;
pub mod pr;

pub use coverage::CoverageSnapshot;
pub use ids::{RepoId, Sha};
pub use pr::{BranchRef, PullRequestRef};
