//! Coverage Status Bot - A GitHub bot that reports Code Climate coverage deltas
//! as commit statuses on pull requests.
//!
//! This library provides the webhook server, the coverage poller and the
//! clients for the two external services it talks to.

pub mod config;
pub mod coverage;
pub mod github;
pub mod poller;
pub mod server;
pub mod status;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_utils;
