//! Per-caller username preferences
//!
//! Embedding hosts (chat/command layers) can remember a preferred Last.fm
//! username per caller. Each caller gets one small TOML file under a
//! `players/` directory; the core service never reads these.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefFile {
    #[serde(default)]
    lastfm_username: String,
}

/// File-backed store of per-caller username preferences
#[derive(Debug, Clone)]
pub struct PlayerPrefs {
    dir: PathBuf,
}

impl PlayerPrefs {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the default platform config directory
    pub fn open_default() -> Self {
        Self::new(crate::config::config_dir().join("players"))
    }

    /// Preferred username for `caller`, or `fallback` when none is stored
    ///
    /// Read failures degrade to the fallback; a caller without a preference
    /// is not an error.
    pub fn username_for(&self, caller: Uuid, fallback: &str) -> String {
        let path = self.player_file(caller);
        if !path.exists() {
            return fallback.to_string();
        }
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<PrefFile>(&content).map_err(|e| e.to_string()))
        {
            Ok(prefs) if !prefs.lastfm_username.trim().is_empty() => {
                prefs.lastfm_username.trim().to_string()
            }
            Ok(_) => fallback.to_string(),
            Err(e) => {
                debug!("Unreadable preference file for {}: {}", caller, e);
                fallback.to_string()
            }
        }
    }

    /// Record the preferred username for `caller`
    pub fn set_username(&self, caller: Uuid, username: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let prefs = PrefFile {
            lastfm_username: username.trim().to_string(),
        };
        let content = toml::to_string_pretty(&prefs)
            .map_err(|e| crate::Error::Config(format!("serialize preference: {}", e)))?;
        std::fs::write(self.player_file(caller), content)?;
        Ok(())
    }

    fn player_file(&self, caller: Uuid) -> PathBuf {
        self.dir.join(format!("{}.toml", caller))
    }
}
