//! Persisted service configuration
//!
//! A small TOML file in the platform config directory carrying the Last.fm
//! credentials the poller starts with. Loading is best-effort: a missing or
//! unreadable file falls back to defaults with a logged warning, never an
//! error surfaced to startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Persisted service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Last.fm username to poll
    #[serde(default)]
    pub lastfm_username: String,
    /// Last.fm API key; empty leaves the poller disabled
    #[serde(default)]
    pub lastfm_api_key: String,
}

impl ServiceConfig {
    /// Load the configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the configuration, falling back to defaults
    ///
    /// A missing file is the normal first-run case; an unreadable or
    /// unparsable file is logged and otherwise treated the same way.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Write the configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Setters trim their input, keeping the empty-string sentinel clean
    pub fn set_lastfm_username(&mut self, username: &str) {
        self.lastfm_username = username.trim().to_string();
    }

    pub fn set_lastfm_api_key(&mut self, api_key: &str) {
        self.lastfm_api_key = api_key.trim().to_string();
    }
}

/// Platform config directory for the service (`<config_dir>/nowplay`)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("nowplay"))
        .unwrap_or_else(|| PathBuf::from("./nowplay"))
}

/// Default path of the persisted configuration file
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ServiceConfig::default();
        config.set_lastfm_username("  someuser  ");
        config.set_lastfm_api_key("abc123");
        config.save_to(&path).unwrap();

        let loaded = ServiceConfig::load_from(&path).unwrap();
        assert_eq!(loaded.lastfm_username, "someuser");
        assert_eq!(loaded.lastfm_api_key, "abc123");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "lastfm_username = [not toml").unwrap();

        let config = ServiceConfig::load_or_default(&path);
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "lastfm_username = \"someuser\"\n").unwrap();

        let config = ServiceConfig::load_from(&path).unwrap();
        assert_eq!(config.lastfm_username, "someuser");
        assert_eq!(config.lastfm_api_key, "");
    }
}
