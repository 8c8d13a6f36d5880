//! Shared now-playing state
//!
//! Thread-safe holder for the single latest observation, shared between the
//! HTTP API, the poller, and the embedding host. The value is always
//! replaced as a whole under one write lock, so a snapshot never mixes
//! fields from two different updates.

use chrono::Utc;
use nowplay_common::NowPlaying;
use tokio::sync::RwLock;

/// The one current now-playing value, shared by handle
///
/// Constructed explicitly and passed around as `Arc<NowPlayingStore>`;
/// independent instances can coexist (and do, in tests).
pub struct NowPlayingStore {
    current: RwLock<NowPlaying>,
}

impl NowPlayingStore {
    /// Create a store holding the empty value
    pub fn new() -> Self {
        Self {
            current: RwLock::new(NowPlaying::empty()),
        }
    }

    /// Replace the stored value with a fresh observation
    ///
    /// Fields are trimmed; the update timestamp is set to now. Always
    /// succeeds, and is visible to all readers once the call returns.
    pub async fn update(&self, title: &str, artist: &str, source: &str) {
        let next = NowPlaying {
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
            source: source.trim().to_string(),
            updated_at: Utc::now(),
        };
        *self.current.write().await = next;
    }

    /// Reset to the empty value (all fields empty, timestamp at the epoch)
    pub async fn clear(&self) {
        *self.current.write().await = NowPlaying::empty();
    }

    /// Consistent copy of the current value
    pub async fn snapshot(&self) -> NowPlaying {
        self.current.read().await.clone()
    }
}

impl Default for NowPlayingStore {
    fn default() -> Self {
        Self::new()
    }
}
