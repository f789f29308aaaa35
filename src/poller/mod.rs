//! Coverage polling for pull requests.
//!
//! The poller is the only stateful piece of the bot, and its state lives
//! entirely on the stack of one `poll` call: which cycle it is on. Independent
//! pull requests share nothing but the (read-only) API clients.

mod config;
mod cycle;
mod poll;

pub use config::{ENV_MAX_POLL_CYCLES, ENV_POLL_INTERVAL_MS, PollConfig};
pub use cycle::{CoverageOutcome, evaluate_cycle};
pub use poll::{CoveragePoller, PollError, PollTermination};
