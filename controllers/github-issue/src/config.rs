//! Controller configuration
//!
//! Read once from environment variables at startup and passed down explicitly.

use crate::error::ControllerError;
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_RESYNC_SECONDS: u64 = 60;
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_CONCURRENCY: u16 = 3;

/// Runtime configuration of the controller
#[derive(Clone)]
pub struct Config {
    /// GitHub token (`GIT_TOKEN_GI`)
    pub github_token: String,
    /// GitHub API base URL (`GITHUB_API_URL`)
    pub github_api_url: String,
    /// Namespace to watch, all namespaces when unset (`WATCH_NAMESPACE`)
    pub namespace: Option<String>,
    /// Delay before a successful pass is repeated (`RESYNC_INTERVAL_SECONDS`)
    pub resync_interval: Duration,
    /// Timeout of a single GitHub request (`HTTP_TIMEOUT_SECONDS`)
    pub http_timeout: Duration,
    /// Maximum number of concurrent reconciliations (`RECONCILE_CONCURRENCY`)
    pub concurrency: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("namespace", &self.namespace)
            .field("resync_interval", &self.resync_interval)
            .field("http_timeout", &self.http_timeout)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Config {
    /// Loads the configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let github_token = lookup("GIT_TOKEN_GI")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ControllerError::InvalidConfig("GIT_TOKEN_GI environment variable is required".to_string())
            })?;

        let github_api_url = lookup("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());
        let namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());

        let resync_seconds: u64 = parse_or(&lookup, "RESYNC_INTERVAL_SECONDS", DEFAULT_RESYNC_SECONDS)?;
        let timeout_seconds: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS)?;
        let concurrency: u16 = parse_or(&lookup, "RECONCILE_CONCURRENCY", DEFAULT_CONCURRENCY)?;

        if resync_seconds == 0 || timeout_seconds == 0 {
            return Err(ControllerError::InvalidConfig(
                "RESYNC_INTERVAL_SECONDS and HTTP_TIMEOUT_SECONDS must be positive".to_string(),
            ));
        }

        Ok(Self {
            github_token,
            github_api_url,
            namespace,
            resync_interval: Duration::from_secs(resync_seconds),
            http_timeout: Duration::from_secs(timeout_seconds),
            concurrency,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ControllerError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ControllerError::InvalidConfig(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}
