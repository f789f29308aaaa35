//! Process configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GITHUB_TOKEN` | required |
//! | `CODECLIMATE_API_TOKEN` | required |
//! | `COVERAGE_STATUS_BIND` | `0.0.0.0:3000` |
//! | `CODECLIMATE_API_URL` | `https://codeclimate.com/api` |
//! | `CODECLIMATE_WEB_URL` | `https://codeclimate.com/github` |
//! | `COVERAGE_STATUS_POLL_INTERVAL_MS` | `1000` |
//! | `COVERAGE_STATUS_MAX_POLL_CYCLES` | unset (no cap) |

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use crate::poller::PollConfig;

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_CODECLIMATE_TOKEN: &str = "CODECLIMATE_API_TOKEN";
pub const ENV_BIND: &str = "COVERAGE_STATUS_BIND";
pub const ENV_CODECLIMATE_API_URL: &str = "CODECLIMATE_API_URL";
pub const ENV_CODECLIMATE_WEB_URL: &str = "CODECLIMATE_WEB_URL";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "coverage_status=debug";

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_CODECLIMATE_API_URL: &str = "https://codeclimate.com/api";
const DEFAULT_CODECLIMATE_WEB_URL: &str = "https://codeclimate.com/github";

/// Errors that prevent startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid bind address {value:?}: {reason}")]
    InvalidBind { value: String, reason: String },
}

/// Everything the binary needs to start.
#[derive(Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub github_token: String,
    pub codeclimate_token: String,
    pub codeclimate_api_url: String,
    /// Base of the status `target_url`; `/<owner>/<repo>` is appended.
    pub codeclimate_web_url: String,
    pub poll: PollConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind", &self.bind)
            .field("github_token", &"<redacted>")
            .field("codeclimate_token", &"<redacted>")
            .field("codeclimate_api_url", &self.codeclimate_api_url)
            .field("codeclimate_web_url", &self.codeclimate_web_url)
            .field("poll", &self.poll)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let github_token = required(ENV_GITHUB_TOKEN)?;
        let codeclimate_token = required(ENV_CODECLIMATE_TOKEN)?;

        let bind_value = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBind {
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let codeclimate_api_url = get(ENV_CODECLIMATE_API_URL)
            .unwrap_or_else(|| DEFAULT_CODECLIMATE_API_URL.to_string());
        let codeclimate_web_url = get(ENV_CODECLIMATE_WEB_URL)
            .unwrap_or_else(|| DEFAULT_CODECLIMATE_WEB_URL.to_string());

        Ok(Config {
            bind,
            github_token,
            codeclimate_token,
            codeclimate_api_url,
            codeclimate_web_url,
            poll: PollConfig::from_vars(&var),
        })
    }
}
