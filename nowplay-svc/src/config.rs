//! Runtime configuration for the nowplay service
//!
//! Merges command-line/environment values over the persisted config file.
//! A flag or environment variable wins; the file fills the gaps.

use std::time::Duration;

use nowplay_common::config::ServiceConfig;

/// Default port of the loopback HTTP endpoint
pub const DEFAULT_PORT: u16 = 18080;
/// Default poll period (clamped to the poller's minimum at start)
pub const DEFAULT_POLL_PERIOD_SECS: u64 = 10;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub lastfm_username: String,
    pub lastfm_api_key: String,
    pub poll_period: Duration,
}

impl Config {
    /// Merge flag/env values over the persisted file
    pub fn resolve(
        port: u16,
        cli_username: Option<String>,
        cli_api_key: Option<String>,
        poll_period_secs: u64,
        file: &ServiceConfig,
    ) -> Self {
        let lastfm_username = cli_username
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| file.lastfm_username.clone());
        let lastfm_api_key = cli_api_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| file.lastfm_api_key.clone());

        Self {
            port,
            lastfm_username: lastfm_username.trim().to_string(),
            lastfm_api_key: lastfm_api_key.trim().to_string(),
            poll_period: Duration::from_secs(poll_period_secs),
        }
    }
}
