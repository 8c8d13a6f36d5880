//! Last.fm recent-tracks poller
//!
//! On a fixed schedule, fetches the most recent track for the configured
//! user and feeds it to the shared store. Fetch and parse failures are
//! expected to be transient: a tick that fails is logged and abandoned,
//! and the next tick self-heals.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::state::NowPlayingStore;

const LASTFM_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const USER_AGENT: &str = concat!("nowplay-svc/", env!("CARGO_PKG_VERSION"));
/// Source label stored with every polled update
const SOURCE_LABEL: &str = "Last.fm";
/// Requested poll periods below this are clamped up
const MIN_POLL_PERIOD: Duration = Duration::from_secs(5);
/// Grace before the first poll so the embedding host finishes starting
const INITIAL_DELAY: Duration = Duration::from_secs(2);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Live poll target, read at the start of every tick
#[derive(Debug, Clone, Default)]
pub struct PollerTarget {
    pub username: String,
    pub api_key: String,
}

impl PollerTarget {
    fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.api_key.is_empty()
    }
}

/// One track extracted from the recent-tracks payload
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecentTrack {
    title: String,
    artist: String,
    now_playing: bool,
}

/// Periodic Last.fm poller feeding the shared store
///
/// One scheduling loop exists per poller for the life of the process;
/// `start` while the loop is running only refreshes the live target.
pub struct LastFmPoller {
    inner: Arc<PollerInner>,
    poll_loop: Mutex<Option<JoinHandle<()>>>,
}

/// State shared between the poller handle and its scheduling loop
struct PollerInner {
    store: Arc<NowPlayingStore>,
    target: RwLock<PollerTarget>,
    http_client: reqwest::Client,
}

impl LastFmPoller {
    pub fn new(store: Arc<NowPlayingStore>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| Error::Fetch(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(PollerInner {
                store,
                target: RwLock::new(PollerTarget::default()),
                http_client,
            }),
            poll_loop: Mutex::new(None),
        })
    }

    /// Activate polling for `username` with the given credentials
    ///
    /// A blank API key leaves the poller disabled (warned, not fatal);
    /// calling again with a valid key activates it. Once the scheduling
    /// loop exists, later calls only replace the live target. The
    /// requested period is clamped to a 5 second minimum and the first
    /// poll runs after a short initial delay.
    pub async fn start(&self, api_key: &str, username: &str, period: Duration) {
        if api_key.trim().is_empty() {
            warn!("Last.fm polling disabled: missing API key");
            return;
        }

        {
            let mut target = self.inner.target.write().await;
            target.api_key = api_key.trim().to_string();
            target.username = username.trim().to_string();
        }

        let mut poll_loop = self.poll_loop.lock().await;
        if poll_loop.is_some() {
            return;
        }

        let period = period.max(MIN_POLL_PERIOD);
        info!(
            "Last.fm polling started for user '{}' ({}s period)",
            username.trim(),
            period.as_secs()
        );

        let inner = Arc::clone(&self.inner);
        *poll_loop = Some(tokio::spawn(async move {
            time::sleep(INITIAL_DELAY).await;
            let mut ticker = time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = inner.poll_once().await {
                    debug!("Last.fm poll tick abandoned: {}", e);
                }
            }
        }));
    }

    /// Replace the polled username; blank values are ignored
    pub async fn update_username(&self, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            return;
        }
        self.inner.target.write().await.username = username.to_string();
    }

    /// Replace the API key; blank values are ignored
    pub async fn update_api_key(&self, api_key: &str) {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return;
        }
        self.inner.target.write().await.api_key = api_key.to_string();
    }
}

impl PollerInner {
    /// One poll tick: fetch the most recent track and apply it
    ///
    /// Skips silently when the live target is incomplete. Performs a
    /// single GET; no retry within the tick.
    async fn poll_once(&self) -> Result<()> {
        let target = self.target.read().await.clone();
        if !target.is_complete() {
            return Ok(());
        }

        let response = self
            .http_client
            .get(LASTFM_BASE_URL)
            .query(&[
                ("method", "user.getrecenttracks"),
                ("user", target.username.as_str()),
                ("api_key", target.api_key.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        self.apply_track(extract_first_track(&payload)).await;
        Ok(())
    }

    /// Apply an extracted track to the store
    ///
    /// An empty extraction means "nothing playing": the previous value is
    /// left untouched rather than cleared, so a stale track persists until
    /// another source reports or an explicit clear arrives.
    async fn apply_track(&self, track: Option<RecentTrack>) {
        let Some(track) = track else {
            return;
        };
        debug!(
            "Last.fm reports {} — {} (now playing: {})",
            track.artist, track.title, track.now_playing
        );
        self.store
            .update(&track.title, &track.artist, SOURCE_LABEL)
            .await;
    }
}

/// Targeted extraction over the `user.getrecenttracks` payload
///
/// The shape assumptions are the whole contract:
/// - `recenttracks.track` is an array, or a single object when the API
///   collapses it
/// - the first element carries the track title under `name`
/// - its `artist` object carries the display name under `"#text"`
/// - an in-progress track is tagged `"@attr": {"nowplaying": "true"}`
///
/// Returns None when no track is present or when both title and artist
/// are empty.
fn extract_first_track(payload: &Value) -> Option<RecentTrack> {
    let track = payload.get("recenttracks")?.get("track")?;
    let first = match track {
        Value::Array(items) => items.first()?,
        other => other,
    };

    let title = first
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    let artist = first
        .get("artist")
        .and_then(|a| a.get("#text"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    let now_playing = first
        .get("@attr")
        .and_then(|a| a.get("nowplaying"))
        .and_then(Value::as_str)
        == Some("true");

    if title.is_empty() && artist.is_empty() {
        return None;
    }

    Some(RecentTrack {
        title: title.to_string(),
        artist: artist.to_string(),
        now_playing,
    })
}
