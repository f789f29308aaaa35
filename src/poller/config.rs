//! Polling configuration.
//!
//! There is one fixed delay between cycles and no backoff. Polling is
//! unbounded by default; `max_cycles` exists so an operator can cap it.

use std::time::Duration;

/// Default delay between polling cycles (1 second).
const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Environment variable overriding the delay, in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "COVERAGE_STATUS_POLL_INTERVAL_MS";

/// Environment variable capping the number of cycles per pull request.
pub const ENV_MAX_POLL_CYCLES: &str = "COVERAGE_STATUS_MAX_POLL_CYCLES";

/// Configuration for one poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between a pending cycle and the next one.
    pub interval: Duration,

    /// Maximum number of cycles before giving up with an `error` status.
    ///
    /// `None` polls until coverage resolves, a lookup fails, or the poller is
    /// cancelled.
    pub max_cycles: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    /// Creates a `PollConfig` with default values.
    pub fn new() -> Self {
        PollConfig {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            max_cycles: None,
        }
    }

    /// Creates a `PollConfig` from an arbitrary variable source.
    ///
    /// Unparseable values fall back to the defaults. A cap of `0` means no cap.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let interval_ms = var(ENV_POLL_INTERVAL_MS)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL_MS);

        let max_cycles = var(ENV_MAX_POLL_CYCLES)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n > 0);

        PollConfig {
            interval: Duration::from_millis(interval_ms),
            max_cycles,
        }
    }

    /// Sets the delay between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Caps the number of cycles.
    pub fn with_max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Returns true once `cycles` completed cycles reach the cap.
    pub fn is_exhausted(&self, cycles: u32) -> bool {
        self.max_cycles.is_some_and(|max| cycles >= max)
    }
}
