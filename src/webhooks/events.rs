//! Typed webhook events.
//!
//! Only `pull_request` deliveries whose action changes the head commit are
//! represented. Everything else is dropped by the parser.

use serde::{Deserialize, Serialize};

use crate::types::PullRequestRef;

/// Pull request actions that start a coverage poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrAction {
    /// PR was opened.
    Opened,
    /// PR head was updated (new commits pushed).
    Synchronize,
}

impl PrAction {
    /// Parses GitHub's `action` field. Returns `None` for actions that do
    /// not trigger polling (`closed`, `labeled`, ...).
    pub fn from_api_str(action: &str) -> Option<Self> {
        match action {
            "opened" => Some(PrAction::Opened),
            "synchronize" => Some(PrAction::Synchronize),
            _ => None,
        }
    }
}

/// A `pull_request` delivery that should start a coverage poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub action: PrAction,
    pub pull_request: PullRequestRef,
}
