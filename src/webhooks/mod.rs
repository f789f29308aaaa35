//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Parsing of `pull_request` deliveries into [`PullRequestEvent`]s
//! - The [`WebhookDispatcher`] seam that starts coverage polling in the background

pub mod dispatch;
pub mod events;
pub mod parser;

pub use dispatch::{PollDispatcher, WebhookDispatcher};
pub use events::{PrAction, PullRequestEvent};
pub use parser::{ParseError, parse_webhook};
