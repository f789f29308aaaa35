//! GitHub commit-status writer.
//!
//! Implements [`StatusReporter`](crate::status::StatusReporter) on top of
//! octocrab. A write is one request; failures are logged and handed back to
//! the caller, never retried here.

mod client;
mod error;

pub use client::GitHubStatusClient;
pub use error::GitHubApiError;
